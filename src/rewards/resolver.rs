//! # Reward resolver.
//!
//! Given the purpose of a finished ad and the caller's payload, decides how
//! the earned reward becomes a caller-visible outcome. This is the most
//! load-bearing branch in the crate and it stays a branch: collapsing the
//! two paths into one generic "claim then wrap" flow either double-charges
//! retry rewards or skips claiming the others.

use std::sync::Arc;

use crate::error::AdError;

use super::backend::RewardBackend;
use super::outcome::{RewardOutcome, ShowPayload};
use super::purpose::AdPurpose;

/// Turns an earned reward into a [`RewardOutcome`].
pub struct RewardResolver {
    backend: Arc<dyn RewardBackend>,
}

impl RewardResolver {
    /// Creates a resolver claiming non-retry rewards from `backend`.
    pub fn new(backend: Arc<dyn RewardBackend>) -> Self {
        Self { backend }
    }

    /// Resolves one earned reward.
    ///
    /// - Retry purposes: no backend call; the payload comes straight back in
    ///   a [`RewardOutcome::DirectRetryGrant`]. The move itself is charged
    ///   later, by the caller, with the player's next choice.
    /// - Other purposes: exactly one backend claim, wrapped as
    ///   [`RewardOutcome::ServerGranted`] or surfaced as
    ///   [`AdError::BackendRewardCallFailed`].
    pub async fn resolve(
        &self,
        purpose: AdPurpose,
        payload: ShowPayload,
    ) -> Result<RewardOutcome, AdError> {
        if purpose.is_retry() {
            return Ok(RewardOutcome::DirectRetryGrant { purpose, payload });
        }

        match self.backend.claim(purpose).await {
            Ok(data) => Ok(RewardOutcome::ServerGranted { purpose, data }),
            Err(source) => Err(AdError::BackendRewardCallFailed { source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::rewards::BackendError;

    struct CountingBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingBackend {
        fn arc(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RewardBackend for CountingBackend {
        async fn claim(&self, purpose: AdPurpose) -> Result<Value, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BackendError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(json!({ "granted": purpose.as_label() }))
        }
    }

    fn payload() -> ShowPayload {
        let mut map = ShowPayload::new();
        map.insert("game_id".into(), json!(7));
        map
    }

    #[tokio::test]
    async fn test_retry_purpose_grants_without_backend_call() {
        let backend = CountingBackend::arc(false);
        let resolver = RewardResolver::new(backend.clone());

        let outcome = resolver
            .resolve(AdPurpose::DiceRetry, payload())
            .await
            .expect("retry grant");

        match outcome {
            RewardOutcome::DirectRetryGrant { purpose, payload } => {
                assert_eq!(purpose, AdPurpose::DiceRetry);
                assert_eq!(payload.get("game_id"), Some(&json!(7)));
            }
            other => panic!("expected DirectRetryGrant, got {other:?}"),
        }
        assert_eq!(backend.calls(), 0, "retry purposes must not hit the backend");
    }

    #[tokio::test]
    async fn test_non_retry_purpose_claims_exactly_once() {
        let backend = CountingBackend::arc(false);
        let resolver = RewardResolver::new(backend.clone());

        let outcome = resolver
            .resolve(AdPurpose::EnergyRefill, ShowPayload::new())
            .await
            .expect("server grant");

        match outcome {
            RewardOutcome::ServerGranted { purpose, data } => {
                assert_eq!(purpose, AdPurpose::EnergyRefill);
                assert_eq!(data, json!({ "granted": "energy_refill" }));
            }
            other => panic!("expected ServerGranted, got {other:?}"),
        }
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_with_cause() {
        let backend = CountingBackend::arc(true);
        let resolver = RewardResolver::new(backend.clone());

        let err = resolver
            .resolve(AdPurpose::BonusBox, ShowPayload::new())
            .await
            .expect_err("claim fails");

        assert!(matches!(err, AdError::BackendRewardCallFailed { .. }));
        assert_eq!(backend.calls(), 1, "a failed claim is not retried");
    }
}
