//! # adslot
//!
//! **adslot** is a rewarded-ad lifecycle controller for mobile mini-game
//! clients.
//!
//! It bridges a stateful, single-slot, event-driven third-party ad SDK to
//! callers that want a simple contract: *request a reward, await an
//! outcome*. The controller enforces single-flight access to the one ad
//! resource, survives an SDK that delivers asynchronous, out-of-order,
//! sometimes-duplicated lifecycle events, applies bounded waiting and
//! timeout policy, and — depending on *why* the ad was requested — either
//! claims a reward from the game backend itself or hands the caller a retry
//! grant to spend later.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     UI caller                         vendor ad SDK
//!        │                                   │
//!        │ request_load / request_show       │ ready / error / rewarded /
//!        │ / reset            (commands)     │ dismissed / failed-to-show
//!        ▼                                   ▼ (EventSink)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  AdSlotController (single event loop)                             │
//! │  - normalize(): vendor events → closed AdSignal union             │
//! │  - AdSlot: one resource handle, coarse status                     │
//! │  - PendingSlot: the one outstanding show request                  │
//! │  - timers: load bound (~5s) / show bound (~90s), cycle-tagged     │
//! └──────┬──────────────────────────┬─────────────────────────────────┘
//!        │                          │
//!        ▼                          ▼
//!   RewardResolver              Bus (broadcast)
//!   ├─ retry purpose ──► DirectRetryGrant (no backend call)
//!   └─ other purpose ──► RewardBackend::claim ──► ServerGranted
//! ```
//!
//! ### Lifecycle
//! ```text
//! request_show(purpose, payload)
//!   ├─ pending request exists ──► Err(InFlight)           (fail fast)
//!   ├─ slot Loaded  ──► register pending, present, arm show bound
//!   ├─ slot Loading ──► register pending, arm load bound  (ride the load)
//!   └─ else         ──► register pending, arm load bound, trigger ONE load
//!
//! terminal signal / timeout / reset:
//!   1. complete the pending request (outcome or error)
//!   2. cancel the armed timeout          (before release — a stale timer
//!   3. release the resource handle        must never kill the next attempt)
//!   4. slot → Unloaded
//! ```
//!
//! ## Features
//! | Area            | Description                                            | Key types / traits                    |
//! |-----------------|--------------------------------------------------------|---------------------------------------|
//! | **Controller**  | Single-flight show requests, bounded waits, reset.     | [`AdSlotController`], [`AdSlotHandle`]|
//! | **SDK seam**    | Event-driven vendor contract, opaque resource handle.  | [`RewardedAdSdk`], [`SdkEvent`]       |
//! | **Rewards**     | Purpose-aware resolution: retry grant vs backend claim.| [`AdPurpose`], [`RewardOutcome`]      |
//! | **Backend**     | HTTP/JSON reward endpoints, one claim per reward.      | [`RewardBackend`], [`HttpRewardBackend`]|
//! | **Events**      | Closed signal union + broadcast observability bus.     | [`AdSignal`], [`Event`], [`Bus`]      |
//! | **Errors**      | Typed failure kinds with stable labels.                | [`AdError`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use adslot::{
//!     AdPurpose, AdSlotController, ControllerConfig, HttpRewardBackend, ShowPayload,
//! };
//! # use adslot::{AdHandle, EventSink, LoadOptions, RewardedAdSdk, SdkError, ShowOptions};
//! # use async_trait::async_trait;
//! # struct VendorSdk;
//! # #[async_trait]
//! # impl RewardedAdSdk for VendorSdk {
//! #     fn is_supported(&self) -> bool { true }
//! #     async fn load(&self, _o: &LoadOptions, _e: EventSink) -> Result<(), SdkError> { Ok(()) }
//! #     async fn present(&self, _h: &AdHandle, _o: &ShowOptions, _e: EventSink) -> Result<(), SdkError> { Ok(()) }
//! #     fn release(&self, _h: AdHandle) {}
//! # }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sdk = Arc::new(VendorSdk); // your wrapper around the vendor SDK
//!     let backend = Arc::new(HttpRewardBackend::new("https://game.example/api")?);
//!
//!     let controller = AdSlotController::new(ControllerConfig::default(), sdk, backend);
//!     let handle = controller.handle();
//!     let token = CancellationToken::new();
//!     controller.run(token.clone());
//!
//!     // warm the slot while the player is still on the menu
//!     handle.request_load(AdPurpose::EnergyRefill).await?;
//!
//!     // later: show the ad and await the outcome
//!     let outcome = handle
//!         .request_show(AdPurpose::EnergyRefill, ShowPayload::new())
//!         .await?;
//!     println!("granted: {:?}", outcome);
//!
//!     token.cancel(); // teardown releases the slot
//!     Ok(())
//! }
//! ```

mod config;
mod controller;
mod error;
mod events;
mod pending;
mod rewards;
mod sdk;
mod slot;
mod subscribers;

// ---- Public re-exports ----

pub use config::ControllerConfig;
pub use controller::{AdSlotController, AdSlotHandle};
pub use error::AdError;
pub use events::{normalize, AdSignal, Bus, Event, EventKind};
pub use rewards::{
    AdPurpose, BackendError, HttpRewardBackend, RewardBackend, RewardOutcome, RewardResolver,
    ShowPayload,
};
pub use sdk::{
    AdHandle, EventSink, LoadOptions, RewardedAdSdk, SdkError, SdkEvent, SdkRef, ShowOptions,
};
pub use slot::SlotStatus;
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
