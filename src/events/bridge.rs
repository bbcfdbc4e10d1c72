//! # Event bridge: vendor events → internal signals.
//!
//! Maps each SDK-delivered event to exactly one [`AdSignal`]:
//!
//! | SDK event      | Internal signal |
//! |----------------|-----------------|
//! | `Ready`        | `Loaded`        |
//! | `LoadError`    | `LoadFailed`    |
//! | `Rewarded`     | `RewardEarned`  |
//! | `Dismissed`    | `Dismissed`     |
//! | `FailedToShow` | `ShowFailed`    |
//! | `Impression`   | — (dropped)     |
//!
//! The bridge never reorders events. Tolerating `RewardEarned` followed by
//! `Dismissed` for the same presentation is the controller's job — once the
//! pending request is consumed, later signals for that cycle are no-ops.

use crate::sdk::SdkEvent;

use super::signal::AdSignal;

/// Normalizes one vendor event into an internal signal.
///
/// Returns `None` for purely informational events (`Impression`), which are
/// logged at debug level and otherwise ignored.
pub fn normalize(event: SdkEvent) -> Option<AdSignal> {
    match event {
        SdkEvent::Ready { handle } => Some(AdSignal::Loaded { handle }),
        SdkEvent::LoadError { code, message } => Some(AdSignal::LoadFailed {
            reason: format!("code {code}: {message}"),
        }),
        SdkEvent::Rewarded { amount, item } => {
            log::debug!("reward earned: amount={amount:?} item={item:?}");
            Some(AdSignal::RewardEarned)
        }
        SdkEvent::Dismissed => Some(AdSignal::Dismissed),
        SdkEvent::FailedToShow { code, message } => Some(AdSignal::ShowFailed {
            reason: format!("code {code}: {message}"),
        }),
        SdkEvent::Impression => {
            log::debug!("ad impression recorded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::AdHandle;

    #[test]
    fn test_ready_carries_the_handle() {
        let signal = normalize(SdkEvent::Ready {
            handle: AdHandle::new(7),
        });
        match signal {
            Some(AdSignal::Loaded { handle }) => assert_eq!(handle.id(), 7),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_load_error_flattens_code_and_message() {
        let signal = normalize(SdkEvent::LoadError {
            code: 3,
            message: "no fill".into(),
        });
        match signal {
            Some(AdSignal::LoadFailed { reason }) => {
                assert_eq!(reason, "code 3: no fill");
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_rewarded_maps_to_reward_earned() {
        let signal = normalize(SdkEvent::Rewarded {
            amount: Some(10),
            item: Some("coins".into()),
        });
        assert!(matches!(signal, Some(AdSignal::RewardEarned)));
    }

    #[test]
    fn test_terminal_show_events() {
        assert!(matches!(
            normalize(SdkEvent::Dismissed),
            Some(AdSignal::Dismissed)
        ));
        assert!(matches!(
            normalize(SdkEvent::FailedToShow {
                code: 1,
                message: "already showing".into()
            }),
            Some(AdSignal::ShowFailed { .. })
        ));
    }

    #[test]
    fn test_impression_is_dropped() {
        assert!(normalize(SdkEvent::Impression).is_none());
    }
}
