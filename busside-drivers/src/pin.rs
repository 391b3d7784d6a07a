//! `embedded-hal` output pin adapter

use busside_hal::OutputPin;
use embedded_hal::digital::OutputPin as EhOutputPin;

/// Wraps an `embedded-hal` output pin
///
/// The driven level is tracked locally since reading it back would need
/// `&mut` access on the wrapped pin.
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: EhOutputPin> EhOutput<P> {
    /// Wrap `pin`, driving it low
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin, high: false }
    }
}

impl<P: EhOutputPin> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
