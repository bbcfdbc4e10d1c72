//! # Why the ad is being shown.
//!
//! [`AdPurpose`] determines which reward path applies when the viewer earns
//! the reward: retry purposes resolve locally into a retry grant, the rest
//! claim from a backend endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The caller's reason for requesting a rewarded ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPurpose {
    /// Generic box reward: open a bonus box after watching.
    BonusBox,

    /// Refill the player's energy resource.
    EnergyRefill,

    /// Retry the dice mini-game. Resolves into a retry grant; the actual
    /// move is charged later, when the player rolls again.
    DiceRetry,

    /// Retry the card-flip mini-game. Resolves into a retry grant; the
    /// actual move is charged later, when the player picks again.
    FlipRetry,
}

impl AdPurpose {
    /// True for purposes that resolve into a
    /// [`DirectRetryGrant`](crate::RewardOutcome::DirectRetryGrant) without
    /// any backend call.
    pub fn is_retry(&self) -> bool {
        matches!(self, AdPurpose::DiceRetry | AdPurpose::FlipRetry)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AdPurpose::BonusBox => "bonus_box",
            AdPurpose::EnergyRefill => "energy_refill",
            AdPurpose::DiceRetry => "dice_retry",
            AdPurpose::FlipRetry => "flip_retry",
        }
    }

    /// Reward endpoint path for this purpose; `None` for retry purposes,
    /// which have no endpoint by design.
    pub(crate) fn endpoint(&self) -> Option<&'static str> {
        match self {
            AdPurpose::BonusBox => Some("/rewards/bonus-box"),
            AdPurpose::EnergyRefill => Some("/rewards/energy"),
            AdPurpose::DiceRetry | AdPurpose::FlipRetry => None,
        }
    }
}

impl fmt::Display for AdPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(AdPurpose::DiceRetry.is_retry());
        assert!(AdPurpose::FlipRetry.is_retry());
        assert!(!AdPurpose::BonusBox.is_retry());
        assert!(!AdPurpose::EnergyRefill.is_retry());
    }

    #[test]
    fn test_serde_uses_snake_case_labels() {
        let value = serde_json::to_value(AdPurpose::EnergyRefill).expect("serializes");
        assert_eq!(value, serde_json::json!("energy_refill"));
        let back: AdPurpose = serde_json::from_value(value).expect("deserializes");
        assert_eq!(back, AdPurpose::EnergyRefill);
    }

    #[test]
    fn test_endpoints_exist_exactly_for_non_retry_purposes() {
        for purpose in [
            AdPurpose::BonusBox,
            AdPurpose::EnergyRefill,
            AdPurpose::DiceRetry,
            AdPurpose::FlipRetry,
        ] {
            assert_eq!(
                purpose.endpoint().is_some(),
                !purpose.is_retry(),
                "endpoint presence must mirror the retry split for {purpose}"
            );
        }
    }
}
