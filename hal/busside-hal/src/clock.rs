//! Monotonic time base
//!
//! Signal capture busy-waits against a free-running counter. Putting that
//! counter behind a trait lets the same loops run against a synthetic clock
//! in host tests.

/// Free-running, monotonic tick counter
pub trait MonotonicClock {
    /// Current tick count
    fn now_ticks(&self) -> u64;

    /// Ticks per microsecond (at least 1)
    fn ticks_per_us(&self) -> u32 {
        1
    }

    /// Current time in whole microseconds
    fn now_us(&self) -> u64 {
        self.now_ticks() / u64::from(self.ticks_per_us().max(1))
    }

    /// Convert a microsecond duration to ticks
    fn us_to_ticks(&self, us: u64) -> u64 {
        us.saturating_mul(u64::from(self.ticks_per_us().max(1)))
    }

    /// Convert a tick duration to microseconds, rounded to nearest
    fn ticks_to_us_rounded(&self, ticks: u64) -> u64 {
        let tpu = u64::from(self.ticks_per_us().max(1));
        (ticks + tpu / 2) / tpu
    }

    /// Busy-wait until the counter reaches `deadline`
    fn wait_until(&self, deadline: u64) {
        while self.now_ticks() < deadline {}
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_ticks(&self) -> u64 {
        (**self).now_ticks()
    }

    fn ticks_per_us(&self) -> u32 {
        (**self).ticks_per_us()
    }
}
