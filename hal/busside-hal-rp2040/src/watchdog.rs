//! Hardware watchdog

use busside_hal::Watchdog;
use embassy_rp::watchdog::Watchdog as RpWatchdog;
use embassy_time::Duration;

/// Started RP2040 watchdog
pub struct HwWatchdog {
    inner: RpWatchdog,
}

impl HwWatchdog {
    /// Start the watchdog with the given timeout
    pub fn start(mut inner: RpWatchdog, timeout: Duration) -> Self {
        inner.start(timeout);
        Self { inner }
    }
}

impl Watchdog for HwWatchdog {
    fn feed(&mut self) {
        self.inner.feed();
    }
}
