//! # Caller-visible reward outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::purpose::AdPurpose;

/// Opaque caller-supplied data attached to a show request.
///
/// Passed through unexamined — only the reward resolver touches it, and only
/// to hand it back inside a retry grant (e.g. which game instance is being
/// retried, the player's last choice).
pub type ShowPayload = Map<String, Value>;

/// Successful outcome of a show attempt.
///
/// Failures travel as the `Err` arm of the returned future, never as a
/// synthetic "failed" outcome. Serializable so callers can stash a retry
/// grant until the player actually performs the retried move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardOutcome {
    /// The reward is an authorization to retry: **no backend call was
    /// made**. The caller uses `payload` later, when the player actually
    /// performs the retried move.
    DirectRetryGrant {
        /// Purpose the grant was earned for.
        purpose: AdPurpose,
        /// The caller's payload, returned untouched.
        payload: ShowPayload,
    },

    /// The backend granted the reward at ad-completion time; its response is
    /// attached.
    ServerGranted {
        /// Purpose the reward was claimed for.
        purpose: AdPurpose,
        /// Purpose-specific reward payload from the backend.
        data: Value,
    },
}

impl RewardOutcome {
    /// Purpose this outcome was produced for.
    pub fn purpose(&self) -> AdPurpose {
        match self {
            RewardOutcome::DirectRetryGrant { purpose, .. } => *purpose,
            RewardOutcome::ServerGranted { purpose, .. } => *purpose,
        }
    }

    /// True if this outcome is a retry grant (no backend call was made).
    pub fn is_retry_grant(&self) -> bool {
        matches!(self, RewardOutcome::DirectRetryGrant { .. })
    }
}
