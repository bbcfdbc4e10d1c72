//! # Logging subscriber.
//!
//! [`LogWriter`] forwards controller events to the `log` facade in a compact
//! key=value format. Enabled via the `logging` feature; useful as-is for
//! development, and as a reference for custom subscribers.
//!
//! ## Output format
//! ```text
//! [load-requested] purpose=energy_refill
//! [loaded]
//! [show-requested] purpose=energy_refill cycle=0
//! [presented] purpose=energy_refill
//! [reward-earned] purpose=energy_refill
//! [reward-resolved] purpose=energy_refill
//! [slot-released]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::subscribe::Subscribe;

/// Compact `log`-facade subscriber.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::LoadRequested => {
                log::info!("[load-requested] purpose={:?}", e.purpose)
            }
            EventKind::Loaded => log::info!("[loaded]"),
            EventKind::LoadFailed => {
                log::warn!("[load-failed] reason={:?}", e.reason)
            }
            EventKind::ShowRequested => {
                log::info!("[show-requested] purpose={:?} cycle={:?}", e.purpose, e.cycle)
            }
            EventKind::Presented => log::info!("[presented] purpose={:?}", e.purpose),
            EventKind::RewardEarned => log::info!("[reward-earned] purpose={:?}", e.purpose),
            EventKind::RewardResolved => {
                log::info!(
                    "[reward-resolved] purpose={:?} reason={:?}",
                    e.purpose,
                    e.reason
                )
            }
            EventKind::Dismissed => log::info!("[dismissed]"),
            EventKind::ShowFailed => log::warn!("[show-failed] reason={:?}", e.reason),
            EventKind::TimeoutHit => {
                log::warn!(
                    "[timeout] bound={:?} timeout_ms={:?} cycle={:?}",
                    e.reason,
                    e.timeout_ms,
                    e.cycle
                )
            }
            EventKind::SlotReleased => log::debug!("[slot-released]"),
            EventKind::ResetRequested => log::info!("[reset-requested]"),
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
