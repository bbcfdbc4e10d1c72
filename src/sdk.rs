//! # Ad SDK contract.
//!
//! This module defines the seam between the controller and the third-party
//! rewarded-ad SDK: the [`RewardedAdSdk`] trait (async, event-driven) and the
//! loosely-typed vendor events it delivers through an [`EventSink`].
//!
//! The SDK is stateful and single-slot: one resource may be loaded at a time,
//! represented by the opaque [`AdHandle`] token. Lifecycle outcomes are not
//! return values — the SDK reports them asynchronously as [`SdkEvent`]s,
//! sometimes out of order and sometimes duplicated. The controller's event
//! bridge normalizes that stream; implementations of this trait should
//! forward vendor callbacks verbatim and leave interpretation to the bridge.
//!
//! ## Contract
//! - `load` requests a new resource; the outcome arrives later as
//!   [`SdkEvent::Ready`] or [`SdkEvent::LoadError`]. The returned `Result`
//!   only covers immediate rejection (bad state, not initialized).
//! - `present` shows a loaded resource; terminal outcomes arrive as
//!   [`SdkEvent::Rewarded`] / [`SdkEvent::Dismissed`] /
//!   [`SdkEvent::FailedToShow`].
//! - `release` is the disposal hook. It must be safe to call for a handle
//!   whose presentation already ended.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Opaque token for a loaded ad resource.
///
/// Issued by the SDK in [`SdkEvent::Ready`] and disposed through
/// [`RewardedAdSdk::release`]. The slot's copy is authoritative: clones exist
/// only transiently for the duration of a `present` call, and disposal
/// happens exactly once, through the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHandle(u64);

impl AdHandle {
    /// Wraps a vendor-assigned resource id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the vendor-assigned resource id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Lifecycle events as the vendor SDK delivers them.
///
/// Loosely typed on purpose — this is the shape of the outside world. The
/// event bridge maps each of these onto the crate's closed
/// [`AdSignal`](crate::AdSignal) union.
#[derive(Debug)]
pub enum SdkEvent {
    /// A requested resource finished loading.
    Ready {
        /// Ownership token for the loaded resource.
        handle: AdHandle,
    },

    /// A requested resource failed to load.
    LoadError {
        /// Vendor error code.
        code: i32,
        /// Vendor error description.
        message: String,
    },

    /// The viewer completed the ad and earned the reward.
    Rewarded {
        /// Vendor-reported reward amount, if any.
        amount: Option<u64>,
        /// Vendor-reported reward item name, if any.
        item: Option<String>,
    },

    /// The viewer dismissed the ad.
    ///
    /// Commonly delivered *after* [`SdkEvent::Rewarded`] for the same
    /// presentation.
    Dismissed,

    /// The SDK failed to present a loaded resource.
    FailedToShow {
        /// Vendor error code.
        code: i32,
        /// Vendor error description.
        message: String,
    },

    /// The ad was displayed (billing impression). Informational only.
    Impression,
}

/// Sending side of the SDK event stream.
///
/// Handed to the SDK on `load`/`present`; the controller owns the receiving
/// side. Cheap to clone. Emitting never blocks; events sent after the
/// controller has shut down are dropped.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<SdkEvent>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SdkEvent>) -> Self {
        Self { tx }
    }

    /// Delivers one vendor event to the controller.
    pub fn emit(&self, event: SdkEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("ad event dropped: controller is gone");
        }
    }
}

/// Options for a load request.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Vendor placement/unit identifier, if the app uses more than one.
    pub placement: Option<String>,
}

/// Options for presenting a loaded resource.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Opaque string forwarded to the vendor for server-side verification.
    pub custom_data: Option<String>,
}

/// Immediate SDK call rejection.
///
/// Only covers synchronous failures of `load`/`present`; asynchronous
/// outcomes travel as [`SdkEvent`]s.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SdkError {
    /// The SDK rejected the call outright.
    #[error("ad SDK rejected the call: {message}")]
    Rejected {
        /// Vendor-provided rejection description.
        message: String,
    },

    /// The SDK has not been initialized in this process.
    #[error("ad SDK is not initialized")]
    NotInitialized,
}

/// # The third-party rewarded-ad SDK.
///
/// Implementations wrap a vendor SDK (or a test double) and forward its
/// callbacks into the provided [`EventSink`]. All methods are invoked from
/// the controller's event loop; implementations must not assume a particular
/// thread.
#[async_trait]
pub trait RewardedAdSdk: Send + Sync + 'static {
    /// Availability check: whether this environment can show rewarded ads.
    fn is_supported(&self) -> bool;

    /// Requests a new ad resource.
    ///
    /// The outcome arrives on `events` as [`SdkEvent::Ready`] or
    /// [`SdkEvent::LoadError`]; `Err` here means the request itself was
    /// rejected and no event will follow.
    async fn load(&self, options: &LoadOptions, events: EventSink) -> Result<(), SdkError>;

    /// Presents a loaded resource.
    ///
    /// Terminal outcomes arrive on `events`; `Err` here means presentation
    /// never started.
    async fn present(
        &self,
        handle: &AdHandle,
        options: &ShowOptions,
        events: EventSink,
    ) -> Result<(), SdkError>;

    /// Disposal hook: frees the vendor resource behind `handle`.
    fn release(&self, handle: AdHandle);
}

/// Shared reference to an SDK implementation.
pub type SdkRef = Arc<dyn RewardedAdSdk>;
