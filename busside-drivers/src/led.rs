//! Blinking status LED

use busside_core::traits::StatusIndicator;
use busside_hal::OutputPin;

/// Toggles an LED at a fixed interval while polled
pub struct Blinker<P> {
    pin: P,
    interval_ms: u32,
    last_toggle_us: u64,
}

impl<P: OutputPin> Blinker<P> {
    /// Create a blinker that is off
    pub fn new(mut pin: P) -> Self {
        pin.set_low();
        Self {
            pin,
            interval_ms: 0,
            last_toggle_us: 0,
        }
    }

    /// Whether the LED is currently lit
    pub fn is_lit(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl<P: OutputPin> StatusIndicator for Blinker<P> {
    fn set_interval_ms(&mut self, interval_ms: u32, now_us: u64) {
        self.interval_ms = interval_ms;
        self.last_toggle_us = now_us;
        if interval_ms == 0 {
            self.pin.set_low();
        }
    }

    fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    fn poll(&mut self, now_us: u64) {
        if self.interval_ms == 0 {
            return;
        }
        if now_us.saturating_sub(self.last_toggle_us) >= u64::from(self.interval_ms) * 1000 {
            self.pin.toggle();
            self.last_toggle_us = now_us;
        }
    }
}
