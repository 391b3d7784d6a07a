//! GPIO pin abstractions
//!
//! Provides traits for single digital pins and for the bank of candidate
//! pins an audit probes. Candidate pins change direction at runtime (a pin
//! is sampled as a floating input, then briefly driven during TX probing),
//! so the bank is addressed by index rather than by typed pin.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Toggle the pin state
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Bank of candidate pins addressed by index
///
/// Indices run from `0` to `len() - 1`. Implementations must tolerate any
/// index in that range being switched between input and output at any
/// time; callers validate indices with [`PinBank::contains`] first.
pub trait PinBank {
    /// Number of candidate pins
    fn len(&self) -> usize;

    /// Whether the bank holds no pins
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `index` addresses a pin in this bank
    fn contains(&self, index: usize) -> bool {
        index < self.len()
    }

    /// Read the current level of a pin
    fn is_high(&self, index: usize) -> bool;

    /// Release a pin to a floating input (no pull)
    fn set_input(&mut self, index: usize);

    /// Claim a pin as a push-pull output driven to `high`
    fn set_output(&mut self, index: usize, high: bool);

    /// Drive a pin already claimed as output
    fn set_level(&mut self, index: usize, high: bool);
}

/// One pin of a [`PinBank`] viewed as an [`InputPin`]
///
/// Lets code written against a single input pin (signal capture) sample a
/// bank member without taking it out of the bank.
pub struct BankPin<'a, B: PinBank> {
    bank: &'a B,
    index: usize,
}

impl<'a, B: PinBank> BankPin<'a, B> {
    /// Borrow pin `index` of `bank` as an input
    pub fn new(bank: &'a B, index: usize) -> Self {
        Self { bank, index }
    }

    /// Bank index of this pin
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<B: PinBank> InputPin for BankPin<'_, B> {
    fn is_high(&self) -> bool {
        self.bank.is_high(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBank {
        levels: [bool; 3],
    }

    impl PinBank for FixedBank {
        fn len(&self) -> usize {
            self.levels.len()
        }
        fn is_high(&self, index: usize) -> bool {
            self.levels[index]
        }
        fn set_input(&mut self, _index: usize) {}
        fn set_output(&mut self, index: usize, high: bool) {
            self.levels[index] = high;
        }
        fn set_level(&mut self, index: usize, high: bool) {
            self.levels[index] = high;
        }
    }

    struct Latch(bool);

    impl OutputPin for Latch {
        fn set_high(&mut self) {
            self.0 = true;
        }
        fn set_low(&mut self) {
            self.0 = false;
        }
        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_bank_pin_reads_through() {
        let bank = FixedBank {
            levels: [false, true, false],
        };
        let pin = BankPin::new(&bank, 1);
        assert!(pin.is_high());
        assert_eq!(pin.index(), 1);
        assert!(BankPin::new(&bank, 2).is_low());
    }

    #[test]
    fn test_contains() {
        let bank = FixedBank { levels: [true; 3] };
        assert!(bank.contains(2));
        assert!(!bank.contains(3));
        assert!(!bank.is_empty());
    }

    #[test]
    fn test_toggle_default() {
        let mut led = Latch(false);
        led.toggle();
        assert!(led.is_set_high());
        led.toggle();
        assert!(!led.is_set_high());
    }
}
