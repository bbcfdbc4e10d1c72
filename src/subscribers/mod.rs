//! # Event subscribers.
//!
//! The [`Subscribe`] trait is the extension point for observing controller
//! events broadcast through the [`Bus`](crate::events::Bus) — logging,
//! metrics, UI badges.
//!
//! ```text
//! AdSlotController ── publish(Event) ──► Bus ──► subscriber listener
//!                                                      │
//!                                            ┌─────────┼─────────┐
//!                                            ▼         ▼         ▼
//!                                        LogWriter   Metrics   Custom
//! ```
//!
//! Subscribers are driven sequentially by a single listener task; a slow
//! subscriber delays the others but never the controller itself.

mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use self::log::LogWriter;
