//! # The ad slot: one resource, coarse status.
//!
//! [`AdSlot`] owns the single ad resource handle and its status. All handle
//! mutation goes through [`AdSlot::mark_loading`] / [`AdSlot::store`] /
//! [`AdSlot::release`] / [`AdSlot::fail`], so the disposal hook runs exactly
//! once per resource.
//!
//! ## Invariant
//! `handle` is `Some` if and only if `status == Loaded`. Every transition
//! away from `Loaded` releases the handle through the SDK disposal hook
//! before the status changes.

use crate::sdk::{AdHandle, RewardedAdSdk};

/// Coarse status of the ad slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// No resource held, none requested.
    Unloaded,

    /// A load has been issued to the SDK; waiting for ready/error.
    Loading,

    /// A resource is held and can be presented.
    Loaded,

    /// The last load attempt failed. A fresh load may be issued.
    Failed,
}

impl SlotStatus {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SlotStatus::Unloaded => "unloaded",
            SlotStatus::Loading => "loading",
            SlotStatus::Loaded => "loaded",
            SlotStatus::Failed => "failed",
        }
    }
}

/// Exclusive owner of the single ad resource.
pub(crate) struct AdSlot {
    status: SlotStatus,
    handle: Option<AdHandle>,
}

impl AdSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            status: SlotStatus::Unloaded,
            handle: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// Borrow of the held handle, if loaded.
    pub fn handle(&self) -> Option<&AdHandle> {
        self.handle.as_ref()
    }

    /// Whether a fresh load may be issued (`Unloaded` or `Failed`).
    pub fn can_load(&self) -> bool {
        matches!(self.status, SlotStatus::Unloaded | SlotStatus::Failed)
    }

    /// Transitions to `Loading`, releasing any previously held resource
    /// first.
    pub fn mark_loading(&mut self, sdk: &dyn RewardedAdSdk) {
        self.dispose(sdk);
        self.status = SlotStatus::Loading;
    }

    /// Takes ownership of a freshly loaded resource; status becomes
    /// `Loaded`.
    pub fn store(&mut self, handle: AdHandle) {
        // a previous handle must already be gone (mark_loading released it)
        debug_assert!(self.handle.is_none(), "slot already holds a resource");
        self.handle = Some(handle);
        self.status = SlotStatus::Loaded;
    }

    /// Idempotent release: disposes the held resource, if any, and returns
    /// to `Unloaded`. Safe to call from any state.
    pub fn release(&mut self, sdk: &dyn RewardedAdSdk) {
        self.dispose(sdk);
        self.status = SlotStatus::Unloaded;
    }

    /// Marks the slot `Failed`, disposing the held resource, if any.
    pub fn fail(&mut self, sdk: &dyn RewardedAdSdk) {
        self.dispose(sdk);
        self.status = SlotStatus::Failed;
    }

    fn dispose(&mut self, sdk: &dyn RewardedAdSdk) {
        if let Some(handle) = self.handle.take() {
            sdk.release(handle);
        }
    }

    /// Status/handle coupling check, for assertions.
    #[cfg(test)]
    pub fn invariant_holds(&self) -> bool {
        self.handle.is_some() == (self.status == SlotStatus::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::sdk::{EventSink, LoadOptions, SdkError, ShowOptions};

    #[derive(Default)]
    struct CountingSdk {
        releases: AtomicUsize,
    }

    impl CountingSdk {
        fn releases(&self) -> usize {
            self.releases.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RewardedAdSdk for CountingSdk {
        fn is_supported(&self) -> bool {
            true
        }

        async fn load(&self, _options: &LoadOptions, _events: EventSink) -> Result<(), SdkError> {
            Ok(())
        }

        async fn present(
            &self,
            _handle: &AdHandle,
            _options: &ShowOptions,
            _events: EventSink,
        ) -> Result<(), SdkError> {
            Ok(())
        }

        fn release(&self, _handle: AdHandle) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_handle_present_iff_loaded() {
        let sdk = CountingSdk::default();
        let mut slot = AdSlot::new();
        assert!(slot.invariant_holds());

        slot.mark_loading(&sdk);
        assert!(slot.invariant_holds());

        slot.store(AdHandle::new(1));
        assert_eq!(slot.status(), SlotStatus::Loaded);
        assert!(slot.invariant_holds());

        slot.release(&sdk);
        assert_eq!(slot.status(), SlotStatus::Unloaded);
        assert!(slot.invariant_holds());
    }

    #[test]
    fn test_release_is_idempotent() {
        let sdk = CountingSdk::default();
        let mut slot = AdSlot::new();
        slot.mark_loading(&sdk);
        slot.store(AdHandle::new(1));

        slot.release(&sdk);
        slot.release(&sdk);
        assert_eq!(sdk.releases(), 1, "disposal hook must run exactly once");
        assert_eq!(slot.status(), SlotStatus::Unloaded);
    }

    #[test]
    fn test_reload_releases_previous_resource_first() {
        let sdk = CountingSdk::default();
        let mut slot = AdSlot::new();
        slot.mark_loading(&sdk);
        slot.store(AdHandle::new(1));

        slot.mark_loading(&sdk);
        assert_eq!(sdk.releases(), 1);
        assert_eq!(slot.status(), SlotStatus::Loading);
        assert!(slot.invariant_holds());
    }

    #[test]
    fn test_fail_disposes_and_allows_fresh_load() {
        let sdk = CountingSdk::default();
        let mut slot = AdSlot::new();
        slot.mark_loading(&sdk);
        slot.store(AdHandle::new(1));

        slot.fail(&sdk);
        assert_eq!(sdk.releases(), 1);
        assert_eq!(slot.status(), SlotStatus::Failed);
        assert!(slot.can_load());
        assert!(slot.invariant_holds());
    }
}
