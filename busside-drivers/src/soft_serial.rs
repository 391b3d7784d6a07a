//! Bit-banged UART on pin bank members
//!
//! Timing is derived from a [`MonotonicClock`]: every bit edge is scheduled
//! at an absolute tick computed from the start of the frame, so rounding of
//! the bit period never accumulates across a byte. Frames are 8N1.

use busside_hal::{MonotonicClock, PinBank, SerialChannel};

/// Data bits per frame
const DATA_BITS: u64 = 8;

/// Upper bound on bytes dropped by one discard
const DISCARD_LIMIT: usize = 64;

/// Half-duplex software UART
pub struct SoftSerial<C> {
    clock: C,
    baud: u32,
}

impl<C: MonotonicClock> SoftSerial<C> {
    pub fn new(clock: C, baud: u32) -> Self {
        Self {
            clock,
            baud: baud.max(1),
        }
    }

    /// Current bit rate
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Ticks spanned by `half_bits` half bit periods
    fn offset(&self, half_bits: u64) -> u64 {
        let tick_hz = u64::from(self.clock.ticks_per_us().max(1)) * 1_000_000;
        half_bits * tick_hz / (2 * u64::from(self.baud))
    }

    /// Time one whole frame takes, in microseconds
    fn frame_us(&self) -> u32 {
        let us = (DATA_BITS + 2) * 1_000_000 / u64::from(self.baud);
        u32::try_from(us).unwrap_or(u32::MAX)
    }
}

impl<B: PinBank, C: MonotonicClock> SerialChannel<B> for SoftSerial<C> {
    fn set_baud(&mut self, baud: u32) {
        if baud != 0 {
            self.baud = baud;
        }
    }

    fn write(&mut self, bank: &mut B, tx: usize, data: &[u8]) {
        if !bank.contains(tx) {
            return;
        }
        for &byte in data {
            let start = self.clock.now_ticks();
            let bits = core::iter::once(false)
                .chain((0..DATA_BITS).map(|bit| (byte >> bit) & 1 == 1))
                .chain(core::iter::once(true));
            for (index, level) in bits.enumerate() {
                bank.set_level(tx, level);
                self.clock.wait_until(start + self.offset(2 * (index as u64 + 1)));
            }
        }
    }

    fn read_byte(&mut self, bank: &B, rx: usize, timeout_us: u32) -> Option<u8> {
        if !bank.contains(rx) {
            return None;
        }
        let deadline = self.clock.now_ticks() + self.clock.us_to_ticks(u64::from(timeout_us));
        let start = loop {
            let now = self.clock.now_ticks();
            if !bank.is_high(rx) {
                break now;
            }
            if now >= deadline {
                return None;
            }
        };

        let mut byte = 0u8;
        for bit in 0..DATA_BITS {
            // center of data bit `bit` is 1.5 + bit periods after the start edge
            self.clock.wait_until(start + self.offset(3 + 2 * bit));
            if bank.is_high(rx) {
                byte |= 1 << bit;
            }
        }
        // let the stop bit pass so the next call sees a fresh start edge
        self.clock.wait_until(start + self.offset(2 * DATA_BITS + 3));
        Some(byte)
    }

    fn discard_input(&mut self, bank: &B, rx: usize) {
        let quiet_us = self.frame_us().saturating_mul(2);
        for _ in 0..DISCARD_LIMIT {
            if SerialChannel::<B>::read_byte(self, bank, rx, quiet_us).is_none() {
                break;
            }
        }
    }
}
