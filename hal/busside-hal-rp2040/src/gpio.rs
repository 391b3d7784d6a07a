//! Candidate pins as a runtime-switchable bank

use busside_hal::PinBank;
use embassy_rp::gpio::{Flex, Level, Pull};

/// Fixed set of GPIOs probed by discovery
///
/// Every pin starts as a floating input.
pub struct FlexBank<const N: usize> {
    pins: [Flex<'static>; N],
}

impl<const N: usize> FlexBank<N> {
    pub fn new(mut pins: [Flex<'static>; N]) -> Self {
        for pin in pins.iter_mut() {
            pin.set_pull(Pull::None);
            pin.set_as_input();
        }
        Self { pins }
    }
}

impl<const N: usize> PinBank for FlexBank<N> {
    fn len(&self) -> usize {
        N
    }

    fn is_high(&self, index: usize) -> bool {
        self.pins.get(index).is_some_and(|pin| pin.is_high())
    }

    fn set_input(&mut self, index: usize) {
        if let Some(pin) = self.pins.get_mut(index) {
            pin.set_as_input();
            pin.set_pull(Pull::None);
        }
    }

    fn set_output(&mut self, index: usize, high: bool) {
        if let Some(pin) = self.pins.get_mut(index) {
            // Latch the level first so the line never glitches low
            pin.set_level(Level::from(high));
            pin.set_as_output();
        }
    }

    fn set_level(&mut self, index: usize, high: bool) {
        if let Some(pin) = self.pins.get_mut(index) {
            pin.set_level(Level::from(high));
        }
    }
}
