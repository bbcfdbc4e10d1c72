//! # Controller configuration.
//!
//! Provides [`ControllerConfig`] — centralized settings for the ad slot
//! controller: the two wait bounds, the command queue size, and the event
//! bus capacity.
//!
//! ## Sentinel values
//! - `load_timeout = 0s` → no bound on the load wait (not recommended)
//! - `show_timeout = 0s` → no bound on a show attempt (not recommended)

use std::time::Duration;

/// Configuration for [`AdSlotController`](crate::AdSlotController).
///
/// ## Field semantics
/// - `load_timeout`: Maximum wait for the resource to become ready when a
///   show request arrives before the slot is loaded (`0s` = unbounded)
/// - `show_timeout`: Maximum wait for a terminal SDK event after the ad is
///   presented (`0s` = unbounded)
/// - `queue_capacity`: Command channel size (min 1; clamped)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the `*_bound()` accessors to
/// avoid sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Maximum time a show request waits for the resource to load.
    ///
    /// When a show request arrives and the slot is not loaded, one load is
    /// triggered and the request waits up to this bound for the ready
    /// signal. Exceeding it rejects the request with
    /// [`AdError::LoadTimeout`](crate::AdError::LoadTimeout).
    pub load_timeout: Duration,

    /// Maximum time a presented ad may go without a terminal event.
    ///
    /// Armed when the SDK is asked to present, cleared on any terminal
    /// event. Exceeding it rejects the request with
    /// [`AdError::ShowTimeout`](crate::AdError::ShowTimeout) and releases
    /// the slot.
    pub show_timeout: Duration,

    /// Capacity of the caller command channel.
    pub queue_capacity: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// skip older items.
    pub bus_capacity: usize,
}

impl ControllerConfig {
    /// Returns the load bound as an `Option` (`None` = unbounded).
    #[inline]
    pub fn load_bound(&self) -> Option<Duration> {
        if self.load_timeout == Duration::ZERO {
            None
        } else {
            Some(self.load_timeout)
        }
    }

    /// Returns the show bound as an `Option` (`None` = unbounded).
    #[inline]
    pub fn show_bound(&self) -> Option<Duration> {
        if self.show_timeout == Duration::ZERO {
            None
        } else {
            Some(self.show_timeout)
        }
    }

    /// Returns a queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `load_timeout = 5s` (bounded wait before `LoadTimeout`)
    /// - `show_timeout = 90s` (bounded show attempt before `ShowTimeout`)
    /// - `queue_capacity = 16`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(5),
            show_timeout: Duration::from_secs(90),
            queue_capacity: 16,
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_means_unbounded() {
        let cfg = ControllerConfig {
            load_timeout: Duration::ZERO,
            show_timeout: Duration::ZERO,
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.load_bound(), None);
        assert_eq!(cfg.show_bound(), None);
    }

    #[test]
    fn test_default_bounds() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.load_bound(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.show_bound(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_queue_capacity_clamped() {
        let cfg = ControllerConfig {
            queue_capacity: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.queue_capacity_clamped(), 1);
    }
}
