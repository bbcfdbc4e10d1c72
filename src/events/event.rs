//! # Observability events published by the controller.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (timestamp, purpose, attempt cycle, reason). These events exist for
//! subscribers — logging, metrics, test assertions — and have no effect on
//! the state machine.
//!
//! ## Ordering
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically; use it to restore order when events are observed out of
//! band.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::rewards::AdPurpose;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Load phase ===
    /// A load was issued to the SDK.
    ///
    /// Sets: `purpose`, `at`, `seq`.
    LoadRequested,

    /// The resource became ready and the slot took ownership.
    ///
    /// Sets: `at`, `seq`.
    Loaded,

    /// The load attempt failed (SDK error event or immediate rejection).
    ///
    /// Sets: `reason`, `at`, `seq`.
    LoadFailed,

    // === Show phase ===
    /// A caller asked to show the ad.
    ///
    /// Sets: `purpose`, `cycle`, `at`, `seq`.
    ShowRequested,

    /// The SDK accepted the present call; the ad is on screen.
    ///
    /// Sets: `purpose`, `at`, `seq`.
    Presented,

    /// The viewer earned the reward.
    ///
    /// Sets: `purpose`, `at`, `seq`.
    RewardEarned,

    /// The reward resolver produced the caller-visible outcome.
    ///
    /// Sets: `purpose`, `reason` (on failure), `at`, `seq`.
    RewardResolved,

    /// The viewer dismissed the ad before earning the reward.
    ///
    /// Sets: `at`, `seq`.
    Dismissed,

    /// The SDK could not present the resource.
    ///
    /// Sets: `reason`, `at`, `seq`.
    ShowFailed,

    /// A load or show bound elapsed.
    ///
    /// Sets: `timeout_ms`, `reason` (which bound), `cycle`, `at`, `seq`.
    TimeoutHit,

    // === Slot management ===
    /// The slot released its resource and returned to idle.
    ///
    /// Sets: `at`, `seq`.
    SlotReleased,

    /// A caller (or teardown) forced a reset.
    ///
    /// Sets: `at`, `seq`.
    ResetRequested,
}

/// Controller event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Purpose of the attempt, if applicable.
    pub purpose: Option<AdPurpose>,
    /// Show-attempt cycle number, if applicable.
    pub cycle: Option<u64>,
    /// Elapsed bound in milliseconds (compact), for `TimeoutHit`.
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, which bound, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            purpose: None,
            cycle: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches the purpose of the attempt.
    #[inline]
    pub fn with_purpose(mut self, purpose: AdPurpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Attaches the show-attempt cycle number.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches an elapsed bound (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
