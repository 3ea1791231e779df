//! Millisecond clocks
//!
//! Timestamps are `u32` milliseconds that wrap after ~49.7 days. Consumers
//! compare them with `wrapping_sub`, which stays correct across the wrap as
//! long as the measured span is shorter than the wrap period.

use std::time::Instant;

/// Monotonic millisecond counter
pub trait Clock: Send {
    fn now_ms(&self) -> u32;
}

/// Clock backed by [`Instant`], counting from construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // truncation is the wrap
        self.epoch.elapsed().as_millis() as u32
    }
}
