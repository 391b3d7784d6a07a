//! Little-endian `u32` word payloads
//!
//! Request arguments and reply values are both flat arrays of 32-bit words.

use alloc::vec::Vec;

use crate::frame::{Frame, FrameError};

/// Reply word meaning "nothing found"
pub const NOT_FOUND: u32 = 0xFFFF_FFFF;

/// Read-only view of a payload as `u32` words
///
/// Trailing bytes that do not fill a whole word are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    payload: &'a [u8],
}

impl<'a> Args<'a> {
    /// View a payload as words
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    /// Number of whole words
    pub fn len(&self) -> usize {
        self.payload.len() / 4
    }

    /// Whether the payload holds no whole word
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Word at `index`, if present
    pub fn get(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(4)?;
        let bytes = self.payload.get(start..start.checked_add(4)?)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Builds a reply payload of `u32` words
///
/// The buffer is reserved up front so a reply either fits or reports
/// [`FrameError::OutOfMemory`] before any word is written.
#[derive(Debug)]
pub struct ReplyBuilder {
    payload: Vec<u8>,
}

impl ReplyBuilder {
    /// Reserve room for `words` reply words
    pub fn with_words(words: usize) -> Result<Self, FrameError> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(words * 4)
            .map_err(|_| FrameError::OutOfMemory)?;
        Ok(Self { payload })
    }

    /// Append one word
    pub fn push(&mut self, word: u32) -> Result<(), FrameError> {
        if self.payload.capacity() - self.payload.len() < 4 {
            self.payload
                .try_reserve(4)
                .map_err(|_| FrameError::OutOfMemory)?;
        }
        self.payload.extend_from_slice(&word.to_le_bytes());
        Ok(())
    }

    /// Append a signed status word in two's complement
    pub fn push_status(&mut self, status: i32) -> Result<(), FrameError> {
        self.push(status as u32)
    }

    /// Finish into a reply frame for `command`
    pub fn into_frame(self, command: u32) -> Frame {
        Frame::new(command, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_decode() {
        let payload = [0x03, 0x00, 0x00, 0x00, 0x80, 0x25, 0x00, 0x00, 0xAA];
        let args = Args::new(&payload);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some(3));
        assert_eq!(args.get(1), Some(9600));
        assert_eq!(args.get(2), None);
        assert_eq!(args.get(usize::MAX), None);
        assert!(Args::new(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_reply_words() {
        let mut reply = ReplyBuilder::with_words(3).unwrap();
        reply.push(9600).unwrap();
        reply.push(NOT_FOUND).unwrap();
        reply.push_status(-2).unwrap();
        let frame = reply.into_frame(21);

        assert_eq!(frame.command, 21);
        let args = Args::new(&frame.payload);
        assert_eq!(args.get(0), Some(9600));
        assert_eq!(args.get(1), Some(NOT_FOUND));
        assert_eq!(args.get(2).map(|w| w as i32), Some(-2));
    }

    #[test]
    fn test_push_beyond_reservation() {
        let mut reply = ReplyBuilder::with_words(0).unwrap();
        reply.push(1).unwrap();
        reply.push(2).unwrap();
        assert_eq!(reply.into_frame(0).payload.len(), 8);
    }
}
