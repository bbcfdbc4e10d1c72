//! Error types surfaced by the ad slot controller.
//!
//! All failures of a load or show attempt are reported through a single enum,
//! [`AdError`], carried in the rejected future returned by
//! [`AdSlotHandle::request_show`](crate::AdSlotHandle::request_show).
//!
//! Every error fully resets the slot before it reaches the caller: the
//! resource handle is released and the controller is immediately usable
//! again. The controller never retries on its own beyond the single bounded
//! load wait — whether to try again is a caller decision, and
//! [`AdError::is_retryable`] tells the caller which kinds are worth it.

use std::time::Duration;

use thiserror::Error;

use crate::rewards::BackendError;

/// # Errors produced by the rewarded-ad lifecycle.
///
/// The first seven variants correspond to the ways a single load/show attempt
/// can fail; `InFlight`, `Cancelled`, and `Closed` are controller-level
/// conditions (admission, teardown, dead loop).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AdError {
    /// The environment cannot show rewarded ads at all (no SDK support).
    ///
    /// Not retryable: the caller should fall back to a non-ad flow.
    #[error("rewarded ads are not supported in this environment")]
    SdkUnsupported,

    /// The SDK reported that the ad resource failed to load.
    #[error("ad resource failed to load: {reason}")]
    LoadFailed {
        /// SDK-provided failure description.
        reason: String,
    },

    /// The bounded load wait elapsed without the resource becoming ready.
    #[error("ad resource not ready after {timeout:?}")]
    LoadTimeout {
        /// The configured load bound that was exceeded.
        timeout: Duration,
    },

    /// The SDK could not present the loaded resource.
    #[error("ad could not be presented: {reason}")]
    ShowFailed {
        /// SDK-provided failure description.
        reason: String,
    },

    /// No terminal event arrived within the show bound.
    #[error("no terminal ad event within {timeout:?}")]
    ShowTimeout {
        /// The configured show bound that was exceeded.
        timeout: Duration,
    },

    /// The viewer dismissed the ad before the reward was earned.
    #[error("ad dismissed before the reward was earned")]
    UserCancelled,

    /// The reward endpoint call failed (non-retry purposes only).
    #[error("reward endpoint call failed")]
    BackendRewardCallFailed {
        /// The underlying backend failure.
        #[source]
        source: BackendError,
    },

    /// Another show request is already in flight (single-flight violation).
    ///
    /// The in-flight request is not disturbed; only the late caller fails.
    #[error("another rewarded-ad request is already in flight")]
    InFlight,

    /// The request was cancelled by [`reset`](crate::AdSlotHandle::reset) or
    /// controller teardown.
    #[error("rewarded-ad request cancelled")]
    Cancelled,

    /// The controller loop is not running (never started, or shut down).
    #[error("ad slot controller is closed")]
    Closed,
}

impl AdError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use adslot::AdError;
    ///
    /// assert_eq!(AdError::UserCancelled.as_label(), "user_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AdError::SdkUnsupported => "sdk_unsupported",
            AdError::LoadFailed { .. } => "load_failed",
            AdError::LoadTimeout { .. } => "load_timeout",
            AdError::ShowFailed { .. } => "show_failed",
            AdError::ShowTimeout { .. } => "show_timeout",
            AdError::UserCancelled => "user_cancelled",
            AdError::BackendRewardCallFailed { .. } => "backend_reward_call_failed",
            AdError::InFlight => "in_flight",
            AdError::Cancelled => "cancelled",
            AdError::Closed => "closed",
        }
    }

    /// Indicates whether a fresh attempt may reasonably succeed.
    ///
    /// Load/show failures and timeouts are transient SDK conditions, and a
    /// dismissal only means the viewer changed their mind. `SdkUnsupported`,
    /// backend rejections, and controller-level conditions are not retryable
    /// as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdError::LoadFailed { .. }
                | AdError::LoadTimeout { .. }
                | AdError::ShowFailed { .. }
                | AdError::ShowTimeout { .. }
                | AdError::UserCancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let cases: Vec<(AdError, &str)> = vec![
            (AdError::SdkUnsupported, "sdk_unsupported"),
            (
                AdError::LoadFailed {
                    reason: "no fill".into(),
                },
                "load_failed",
            ),
            (
                AdError::LoadTimeout {
                    timeout: Duration::from_secs(5),
                },
                "load_timeout",
            ),
            (
                AdError::ShowTimeout {
                    timeout: Duration::from_secs(90),
                },
                "show_timeout",
            ),
            (AdError::InFlight, "in_flight"),
            (AdError::Cancelled, "cancelled"),
            (AdError::Closed, "closed"),
        ];
        for (err, label) in cases {
            assert_eq!(err.as_label(), label, "label mismatch for {err:?}");
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AdError::LoadFailed {
            reason: "no fill".into()
        }
        .is_retryable());
        assert!(AdError::ShowTimeout {
            timeout: Duration::from_secs(90)
        }
        .is_retryable());
        assert!(AdError::UserCancelled.is_retryable());

        assert!(!AdError::SdkUnsupported.is_retryable());
        assert!(!AdError::InFlight.is_retryable());
        assert!(!AdError::Cancelled.is_retryable());
        assert!(!AdError::Closed.is_retryable());
    }
}
