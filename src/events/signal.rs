//! # Internal lifecycle signals.
//!
//! [`AdSignal`] is the closed union the controller's transition function
//! matches on — one variant per lifecycle outcome, nothing vendor-shaped.
//! Keeping the set closed means every handler match is exhaustively checked;
//! a new vendor event cannot silently fall through.

use crate::sdk::AdHandle;

/// Normalized lifecycle signal, produced by
/// [`normalize`](crate::events::normalize) from a raw SDK event.
#[derive(Debug)]
pub enum AdSignal {
    /// The requested resource is ready; the slot takes ownership of `handle`.
    Loaded {
        /// Ownership token for the loaded resource.
        handle: AdHandle,
    },

    /// The load attempt failed.
    LoadFailed {
        /// Flattened vendor error description.
        reason: String,
    },

    /// The viewer earned the reward; routed to the reward resolver.
    RewardEarned,

    /// The viewer dismissed the ad.
    ///
    /// Terminal only if the pending request has not already been consumed by
    /// a preceding `RewardEarned`.
    Dismissed,

    /// The SDK could not present the resource.
    ShowFailed {
        /// Flattened vendor error description.
        reason: String,
    },
}
