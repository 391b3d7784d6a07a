//! Traits implemented outside this crate

/// Blinking status indicator
///
/// Polled from the idle loop; implementations toggle their output when the
/// configured interval has elapsed.
pub trait StatusIndicator {
    /// Set the blink interval, `0` turns the indicator off
    fn set_interval_ms(&mut self, interval_ms: u32, now_us: u64);

    /// Current blink interval
    fn interval_ms(&self) -> u32;

    /// Advance the blink state to `now_us`
    fn poll(&mut self, now_us: u64);
}

/// Indicator that does nothing, for boards without an LED
#[derive(Debug, Default)]
pub struct NoIndicator {
    interval_ms: u32,
}

impl StatusIndicator for NoIndicator {
    fn set_interval_ms(&mut self, interval_ms: u32, _now_us: u64) {
        self.interval_ms = interval_ms;
    }

    fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    fn poll(&mut self, _now_us: u64) {}
}
