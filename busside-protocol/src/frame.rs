//! Frame encoding and decoding for the host protocol.
//!
//! Frame format:
//! - SYNC (2 bytes): 0xFE 0xCA synchronization marker
//! - COMMAND (4 bytes): command tag
//! - SEQUENCE (4 bytes): request sequence number, echoed in the reply
//! - LENGTH (4 bytes): payload length (0-32768 inbound)
//! - CHECKSUM (4 bytes): CRC-32 of header and payload, checksum field zeroed
//! - PAYLOAD (LENGTH bytes)
//!
//! All header fields are little-endian.

use alloc::vec::Vec;

use crate::crc::Crc32;

/// Frame synchronization marker
pub const SYNC: [u8; 2] = [0xFE, 0xCA];

/// Header size in bytes (four `u32` fields)
pub const HEADER_LEN: usize = 16;

/// Maximum inbound payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 32768;

/// Errors that can occur while building or validating a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared payload exceeds [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Payload buffer could not be allocated
    OutOfMemory,
}

/// Fixed-size frame header as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHeader {
    /// Command tag
    pub command: u32,
    /// Sequence number
    pub sequence: u32,
    /// Payload length in bytes
    pub length: u32,
    /// CRC-32 over header (this field zeroed) and payload
    pub checksum: u32,
}

impl FrameHeader {
    /// Decode a header from its wire bytes
    pub fn decode(bytes: &[u8; HEADER_LEN]) -> Self {
        let word = |i: usize| {
            u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]])
        };
        Self {
            command: word(0),
            sequence: word(4),
            length: word(8),
            checksum: word(12),
        }
    }

    /// Encode this header into its wire bytes
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.command.to_le_bytes());
        out[4..8].copy_from_slice(&self.sequence.to_le_bytes());
        out[8..12].copy_from_slice(&self.length.to_le_bytes());
        out[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Declared payload length, checked against the inbound ceiling
    ///
    /// Must be called before any payload buffer is allocated.
    pub fn payload_len(&self) -> Result<usize, FrameError> {
        let len = self.length as usize;
        if len > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        Ok(len)
    }

    /// Compute the checksum this header and `payload` should carry
    pub fn compute_checksum(&self, payload: &[u8]) -> u32 {
        let zeroed = FrameHeader {
            checksum: 0,
            ..*self
        };
        let mut crc = Crc32::new();
        crc.update(&zeroed.encode());
        crc.update(payload);
        crc.finish()
    }
}

/// A parsed request or a reply under construction
///
/// The frame owns its payload; dropping the frame releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command tag
    pub command: u32,
    /// Sequence number
    pub sequence: u32,
    /// Payload data
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a frame with the given command and payload
    pub fn new(command: u32, payload: Vec<u8>) -> Self {
        Self {
            command,
            sequence: 0,
            payload,
        }
    }

    /// Allocate a zeroed payload buffer of exactly `len` bytes
    ///
    /// Allocation failure is reported instead of aborting.
    pub fn alloc_payload(len: usize) -> Result<Vec<u8>, FrameError> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(len)
            .map_err(|_| FrameError::OutOfMemory)?;
        payload.resize(len, 0);
        Ok(payload)
    }

    /// Assemble a received frame, verifying its checksum
    pub fn from_parts(header: &FrameHeader, payload: Vec<u8>) -> Result<Self, FrameError> {
        if header.compute_checksum(&payload) != header.checksum {
            return Err(FrameError::InvalidChecksum);
        }
        Ok(Self {
            command: header.command,
            sequence: header.sequence,
            payload,
        })
    }

    /// Header for this frame with a freshly computed checksum
    pub fn header(&self) -> FrameHeader {
        let mut header = FrameHeader {
            command: self.command,
            sequence: self.sequence,
            length: self.payload.len() as u32,
            checksum: 0,
        };
        header.checksum = header.compute_checksum(&self.payload);
        header
    }

    /// Encode sync marker, header and payload into one buffer
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, FrameError> {
        let total = SYNC.len() + HEADER_LEN + self.payload.len();
        let mut out = Vec::new();
        out.try_reserve_exact(total)
            .map_err(|_| FrameError::OutOfMemory)?;
        out.extend_from_slice(&SYNC);
        out.extend_from_slice(&self.header().encode());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc32;
    use alloc::vec;

    #[test]
    fn test_header_layout() {
        let header = FrameHeader {
            command: 0x0B,
            sequence: 0x0102_0304,
            length: 8,
            checksum: 0xAABB_CCDD,
        };
        let bytes = header.encode();
        assert_eq!(&bytes[0..4], &[0x0B, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[8, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(FrameHeader::decode(&bytes), header);
    }

    #[test]
    fn test_checksum_zeroes_own_field() {
        let mut frame = Frame::new(7, vec![0x78, 0x56, 0x34, 0x12]);
        frame.sequence = 9;
        let header = frame.header();

        let mut covered = [0u8; HEADER_LEN + 4];
        covered[..HEADER_LEN].copy_from_slice(
            &FrameHeader {
                checksum: 0,
                ..header
            }
            .encode(),
        );
        covered[HEADER_LEN..].copy_from_slice(&frame.payload);
        assert_eq!(header.checksum, crc32(&covered));
    }

    #[test]
    fn test_checksum_known_value() {
        // command 0, sequence 7, one argument word 0x12345678
        let frame = Frame {
            command: 0,
            sequence: 7,
            payload: vec![0x78, 0x56, 0x34, 0x12],
        };
        assert_eq!(frame.header().checksum, 0x7F03_0049);
    }

    #[test]
    fn test_from_parts_rejects_corruption() {
        let frame = Frame::new(0, vec![1, 2, 3, 4]);
        let header = frame.header();

        let mut corrupted = frame.payload.clone();
        corrupted[2] ^= 0x40;
        assert_eq!(
            Frame::from_parts(&header, corrupted),
            Err(FrameError::InvalidChecksum)
        );

        let parsed = Frame::from_parts(&header, frame.payload.clone()).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_oversized_length_rejected() {
        let header = FrameHeader {
            command: 0,
            sequence: 1,
            length: 40000,
            checksum: 0,
        };
        assert_eq!(header.payload_len(), Err(FrameError::PayloadTooLarge));

        let at_limit = FrameHeader {
            length: MAX_PAYLOAD_SIZE as u32,
            ..header
        };
        assert_eq!(at_limit.payload_len(), Ok(MAX_PAYLOAD_SIZE));
    }

    #[test]
    fn test_alloc_payload_exact() {
        let payload = Frame::alloc_payload(12).unwrap();
        assert_eq!(payload.len(), 12);
        assert!(payload.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_to_vec() {
        let frame = Frame::new(45, vec![0xF4, 0x01, 0, 0]);
        let bytes = frame.encode_to_vec().unwrap();
        assert_eq!(&bytes[..2], &SYNC);
        assert_eq!(bytes.len(), 2 + HEADER_LEN + 4);

        let mut raw = [0u8; HEADER_LEN];
        raw.copy_from_slice(&bytes[2..2 + HEADER_LEN]);
        let header = FrameHeader::decode(&raw);
        assert_eq!(header.command, 45);
        assert_eq!(header.length, 4);
        assert_eq!(&bytes[2 + HEADER_LEN..], &[0xF4, 0x01, 0, 0]);
    }
}
