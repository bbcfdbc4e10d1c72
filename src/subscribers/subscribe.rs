//! # Core subscriber trait.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from the controller's listener task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits);
/// publishing is never delayed by subscribers, but fellow subscribers are.
///
/// # Example
/// ```rust
/// use adslot::{Event, EventKind, Subscribe};
/// use async_trait::async_trait;
///
/// struct RewardCounter;
///
/// #[async_trait]
/// impl Subscribe for RewardCounter {
///     async fn on_event(&self, event: &Event) {
///         if event.kind == EventKind::RewardResolved {
///             // increment a counter...
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "reward-counter"
///     }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
