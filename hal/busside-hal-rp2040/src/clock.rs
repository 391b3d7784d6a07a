//! Monotonic clock over the embassy time driver

use busside_hal::MonotonicClock;
use embassy_time::{Instant, TICK_HZ};

/// Reads the free-running embassy timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TimerClock;

impl MonotonicClock for TimerClock {
    fn now_ticks(&self) -> u64 {
        Instant::now().as_ticks()
    }

    fn ticks_per_us(&self) -> u32 {
        (TICK_HZ / 1_000_000).max(1) as u32
    }
}
