//! Framed transport over the host link

use alloc::vec::Vec;

use busside_hal::{HostLink, MonotonicClock, Watchdog};
use busside_protocol::{Frame, FrameError, FrameHeader, HEADER_LEN, SYNC};

/// Why a request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveError {
    /// Header did not arrive in time
    HeaderTimeout,
    /// Declared payload exceeds the inbound limit
    PayloadTooLarge,
    /// Payload buffer could not be allocated
    OutOfMemory,
    /// Payload did not arrive in time
    PayloadTimeout,
    /// Checksum mismatch
    BadChecksum,
}

impl From<FrameError> for ReceiveError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::PayloadTooLarge => ReceiveError::PayloadTooLarge,
            FrameError::InvalidChecksum => ReceiveError::BadChecksum,
            FrameError::OutOfMemory => ReceiveError::OutOfMemory,
        }
    }
}

/// Tracks the two-byte sync marker across a byte stream
#[derive(Debug, Default)]
pub struct SyncScanner {
    armed: bool,
}

impl SyncScanner {
    /// Feed one byte, returning true when the marker is complete
    pub fn push(&mut self, byte: u8) -> bool {
        if self.armed && byte == SYNC[1] {
            self.armed = false;
            return true;
        }
        self.armed = byte == SYNC[0];
        false
    }
}

/// Fill `buf` from the link before `deadline_us`
fn read_exact<L, C, W>(link: &mut L, clock: &C, watchdog: &mut W, buf: &mut [u8], deadline_us: u64) -> bool
where
    L: HostLink,
    C: MonotonicClock,
    W: Watchdog,
{
    let mut filled = 0;
    while filled < buf.len() {
        match link.read_byte() {
            Some(byte) => {
                buf[filled] = byte;
                filled += 1;
            }
            None if clock.now_us() >= deadline_us => return false,
            None => watchdog.feed(),
        }
    }
    true
}

/// Read the header and payload that follow a sync marker
///
/// The payload length is checked before anything is allocated. On a
/// timeout pending input is flushed so the next sync search starts clean.
pub fn receive_frame<L, C, W>(link: &mut L, clock: &C, watchdog: &mut W, timeout_ms: u32) -> Result<Frame, ReceiveError>
where
    L: HostLink,
    C: MonotonicClock,
    W: Watchdog,
{
    let timeout_us = u64::from(timeout_ms) * 1000;

    let mut raw = [0u8; HEADER_LEN];
    if !read_exact(link, clock, watchdog, &mut raw, clock.now_us() + timeout_us) {
        link.discard_input();
        return Err(ReceiveError::HeaderTimeout);
    }
    let header = FrameHeader::decode(&raw);
    let len = header.payload_len()?;

    let mut payload: Vec<u8> = Frame::alloc_payload(len)?;
    if !read_exact(link, clock, watchdog, &mut payload, clock.now_us() + timeout_us) {
        link.discard_input();
        return Err(ReceiveError::PayloadTimeout);
    }

    Ok(Frame::from_parts(&header, payload)?)
}

/// Transmit `reply` as the answer to request `sequence`
pub fn send_frame<L: HostLink>(link: &mut L, mut reply: Frame, sequence: u32) -> Result<(), L::Error> {
    reply.sequence = sequence;
    let header = reply.header();
    link.write_all(&SYNC)?;
    link.write_all(&header.encode())?;
    link.write_all(&reply.payload)?;
    link.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingWatchdog, ScriptedLink, SimClock};
    use alloc::vec;

    fn request(command: u32, sequence: u32, payload: &[u8]) -> Vec<u8> {
        let mut frame = Frame::new(command, payload.to_vec());
        frame.sequence = sequence;
        frame.encode_to_vec().unwrap()
    }

    #[test]
    fn test_sync_scanner() {
        let mut scanner = SyncScanner::default();
        let hits: Vec<bool> = [0x00, 0xFE, 0xFE, 0xCA, 0xCA, 0xFE, 0x01, 0xCA]
            .iter()
            .map(|&b| scanner.push(b))
            .collect();
        assert_eq!(hits, vec![false, false, false, true, false, false, false, false]);
    }

    #[test]
    fn test_receive_valid_frame() {
        let bytes = request(0, 7, &0x1234_5678u32.to_le_bytes());
        let mut link = ScriptedLink::with_input(&bytes[SYNC.len()..]);
        let clock = SimClock::new(1, 1);
        let mut watchdog = CountingWatchdog::default();

        let frame = receive_frame(&mut link, &clock, &mut watchdog, 1000).unwrap();
        assert_eq!(frame.command, 0);
        assert_eq!(frame.sequence, 7);
        assert_eq!(frame.payload, vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_oversized_payload_rejected_before_read() {
        let header = FrameHeader {
            command: 0,
            sequence: 1,
            length: 40000,
            checksum: 0,
        };
        let mut input = header.encode().to_vec();
        input.extend_from_slice(&[0xAA; 8]);
        let mut link = ScriptedLink::with_input(&input);
        let clock = SimClock::new(1, 1);
        let mut watchdog = CountingWatchdog::default();

        let result = receive_frame(&mut link, &clock, &mut watchdog, 1000);
        assert_eq!(result, Err(ReceiveError::PayloadTooLarge));
        assert_eq!(link.input.len(), 8);
    }

    #[test]
    fn test_header_timeout_flushes() {
        let mut link = ScriptedLink::with_input(&[1, 2, 3]);
        let clock = SimClock::new(1, 100);
        let mut watchdog = CountingWatchdog::default();

        let result = receive_frame(&mut link, &clock, &mut watchdog, 1000);
        assert_eq!(result, Err(ReceiveError::HeaderTimeout));
        assert!(link.input.is_empty());
        assert!(clock.peek() >= 1_000_000);
    }

    #[test]
    fn test_short_payload_times_out() {
        let bytes = request(0, 1, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut link = ScriptedLink::with_input(&bytes[SYNC.len()..bytes.len() - 3]);
        let clock = SimClock::new(1, 100);
        let mut watchdog = CountingWatchdog::default();

        let result = receive_frame(&mut link, &clock, &mut watchdog, 1000);
        assert_eq!(result, Err(ReceiveError::PayloadTimeout));
    }

    #[test]
    fn test_bad_checksum() {
        let mut bytes = request(0, 1, &[1, 2, 3, 4]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let mut link = ScriptedLink::with_input(&bytes[SYNC.len()..]);
        let clock = SimClock::new(1, 1);
        let mut watchdog = CountingWatchdog::default();

        let result = receive_frame(&mut link, &clock, &mut watchdog, 1000);
        assert_eq!(result, Err(ReceiveError::BadChecksum));
    }

    #[test]
    fn test_send_stamps_sequence() {
        let mut link = ScriptedLink::default();
        send_frame(&mut link, Frame::new(21, vec![6, 0, 0, 0]), 42).unwrap();

        assert_eq!(&link.output[..2], &SYNC);
        let mut raw = [0u8; HEADER_LEN];
        raw.copy_from_slice(&link.output[2..2 + HEADER_LEN]);
        let header = FrameHeader::decode(&raw);
        assert_eq!(header.command, 21);
        assert_eq!(header.sequence, 42);
        assert_eq!(header.length, 4);
        assert_eq!(header.checksum, header.compute_checksum(&[6, 0, 0, 0]));
        assert_eq!(&link.output[2 + HEADER_LEN..], &[6, 0, 0, 0]);
    }
}
