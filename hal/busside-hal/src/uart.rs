//! Serial communication abstractions
//!
//! Two kinds of serial port exist on the probe: the host link (a hardware
//! UART or USB bridge to the auditing tool) and the software serial channel
//! opened on arbitrary candidate pins of the audited bus.

use crate::gpio::PinBank;

/// Upper bound on bytes dropped by a single [`HostLink::discard_input`]
const DISCARD_LIMIT: usize = 4096;

/// Byte stream to the host tool
///
/// Reads never block: the caller owns every timeout so that it can keep
/// the watchdog fed while it waits.
pub trait HostLink {
    /// Error type for transmit operations
    type Error;

    /// Take one received byte, if any is pending
    fn read_byte(&mut self) -> Option<u8>;

    /// Write all bytes, blocking until they are queued
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Drop pending input
    ///
    /// Bounded so a host that never stops sending cannot stall the caller.
    fn discard_input(&mut self) {
        for _ in 0..DISCARD_LIMIT {
            if self.read_byte().is_none() {
                break;
            }
        }
    }
}

/// Half-duplex serial channel over two pins of a [`PinBank`]
///
/// The channel never owns the pins: the caller claims the TX pin as an
/// output beforehand and releases it afterwards.
pub trait SerialChannel<B: PinBank> {
    /// Select the bit rate used by subsequent transfers
    fn set_baud(&mut self, baud: u32);

    /// Transmit bytes on `tx` (8 data bits, no parity, 1 stop bit)
    fn write(&mut self, bank: &mut B, tx: usize, data: &[u8]);

    /// Receive one byte on `rx`, giving up after `timeout_us` without a start bit
    fn read_byte(&mut self, bank: &B, rx: usize, timeout_us: u32) -> Option<u8>;

    /// Drop whatever is arriving on `rx` until the line goes quiet
    fn discard_input(&mut self, bank: &B, rx: usize);
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    /// Stop bit count as a number
    pub fn count(self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Endless {
        reads: usize,
    }

    impl HostLink for Endless {
        type Error = ();

        fn read_byte(&mut self) -> Option<u8> {
            self.reads += 1;
            Some(0x55)
        }

        fn write_all(&mut self, _data: &[u8]) -> Result<(), ()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_discard_is_bounded() {
        let mut link = Endless { reads: 0 };
        link.discard_input();
        assert_eq!(link.reads, DISCARD_LIMIT);
    }

    #[test]
    fn test_stop_bit_count() {
        assert_eq!(StopBits::One.count(), 1);
        assert_eq!(StopBits::Two.count(), 2);
    }
}
