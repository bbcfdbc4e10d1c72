//! # Single-slot registry for the outstanding show request.
//!
//! [`PendingSlot`] holds at most one [`PendingRequest`] — the continuation to
//! complete plus the caller's opaque payload. This is what enforces
//! single-flight: a second show request while one is registered fails fast
//! instead of queueing.
//!
//! A request is consumed exactly once: by a terminal signal, a timeout, or a
//! reset. Completion is a plain `oneshot` send; a dropped receiver (caller
//! went away) is fine.

use tokio::sync::oneshot;

use crate::error::AdError;
use crate::rewards::{AdPurpose, RewardOutcome, ShowPayload};

/// Completion side of a show request's future.
pub(crate) type Responder = oneshot::Sender<Result<RewardOutcome, AdError>>;

/// Which part of the show flow the request is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    /// Waiting for the resource to load (bounded by the load timeout).
    AwaitingLoad,

    /// The ad is on screen; waiting for a terminal signal (bounded by the
    /// show timeout).
    Presenting,
}

/// The one outstanding show request.
pub(crate) struct PendingRequest {
    pub purpose: AdPurpose,
    pub payload: ShowPayload,
    pub stage: Stage,
    responder: Responder,
}

impl PendingRequest {
    pub fn new(purpose: AdPurpose, payload: ShowPayload, stage: Stage, responder: Responder) -> Self {
        Self {
            purpose,
            payload,
            stage,
            responder,
        }
    }

    /// Completes the request with a final outcome.
    pub fn finish(self, outcome: Result<RewardOutcome, AdError>) {
        // the caller may have dropped the future; nothing to do then
        let _ = self.responder.send(outcome);
    }

    /// Decomposes the request for resolution (reward path needs the payload
    /// before the outcome exists).
    pub fn split(self) -> (AdPurpose, ShowPayload, Responder) {
        (self.purpose, self.payload, self.responder)
    }
}

/// Arena-of-one holder for the pending request.
pub(crate) struct PendingSlot {
    inner: Option<PendingRequest>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self { inner: None }
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.inner.is_some()
    }

    /// Stage of the outstanding request, if any.
    pub fn stage(&self) -> Option<Stage> {
        self.inner.as_ref().map(|req| req.stage)
    }

    /// Purpose of the outstanding request, if any.
    pub fn purpose(&self) -> Option<AdPurpose> {
        self.inner.as_ref().map(|req| req.purpose)
    }

    /// Advances the outstanding request to `stage`.
    pub fn set_stage(&mut self, stage: Stage) {
        if let Some(req) = self.inner.as_mut() {
            req.stage = stage;
        }
    }

    /// Registers a request; gives it back if one is already outstanding.
    pub fn register(&mut self, req: PendingRequest) -> Result<(), PendingRequest> {
        if self.inner.is_some() {
            return Err(req);
        }
        self.inner = Some(req);
        Ok(())
    }

    /// Consumes the outstanding request.
    pub fn take(&mut self) -> Option<PendingRequest> {
        self.inner.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(purpose: AdPurpose) -> (PendingRequest, oneshot::Receiver<Result<RewardOutcome, AdError>>) {
        let (tx, rx) = oneshot::channel();
        (
            PendingRequest::new(purpose, ShowPayload::new(), Stage::AwaitingLoad, tx),
            rx,
        )
    }

    #[test]
    fn test_second_registration_is_refused() {
        let mut slot = PendingSlot::new();
        let (first, _rx1) = request(AdPurpose::BonusBox);
        let (second, _rx2) = request(AdPurpose::EnergyRefill);

        assert!(slot.register(first).is_ok());
        let refused = slot.register(second).expect_err("slot must stay single");
        assert_eq!(refused.purpose, AdPurpose::EnergyRefill);
        assert_eq!(slot.purpose(), Some(AdPurpose::BonusBox), "first stays put");
    }

    #[test]
    fn test_take_consumes() {
        let mut slot = PendingSlot::new();
        let (req, _rx) = request(AdPurpose::DiceRetry);
        assert!(slot.register(req).is_ok());

        assert!(slot.take().is_some());
        assert!(!slot.is_pending());
        assert!(slot.take().is_none(), "a request is consumed exactly once");
    }

    #[tokio::test]
    async fn test_finish_completes_the_future() {
        let mut slot = PendingSlot::new();
        let (req, rx) = request(AdPurpose::FlipRetry);
        assert!(slot.register(req).is_ok());

        slot.take().unwrap().finish(Err(AdError::UserCancelled));
        let outcome = rx.await.expect("responder sent");
        assert!(matches!(outcome, Err(AdError::UserCancelled)));
    }

    #[test]
    fn test_stage_advances_in_place() {
        let mut slot = PendingSlot::new();
        let (req, _rx) = request(AdPurpose::BonusBox);
        assert!(slot.register(req).is_ok());

        assert_eq!(slot.stage(), Some(Stage::AwaitingLoad));
        slot.set_stage(Stage::Presenting);
        assert_eq!(slot.stage(), Some(Stage::Presenting));
    }
}
