//! Lifecycle events: internal signals, observability events, broadcast bus.
//!
//! Two event layers live here, deliberately separate:
//!
//! - [`AdSignal`] — the **closed** set of internal signals the controller
//!   acts on, produced by [`normalize`] from the vendor's loosely-typed
//!   [`SdkEvent`](crate::SdkEvent) stream.
//! - [`Event`]/[`EventKind`] — observability events published to the [`Bus`]
//!   for subscribers (logging, metrics, tests). Nothing in the state machine
//!   depends on them.

mod bridge;
mod bus;
mod event;
mod signal;

pub use bridge::normalize;
pub use bus::Bus;
pub use event::{Event, EventKind};
pub use signal::AdSignal;
