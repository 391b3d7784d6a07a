//! BUSSide Host Protocol
//!
//! This crate defines the request/reply protocol between the host auditing
//! tool and the bridge firmware. Every bus operation rides on it.
//!
//! # Protocol Overview
//!
//! Every message is preceded by a two byte sync marker and carries a fixed
//! header of little-endian `u32` fields:
//! ```text
//! ┌───────────┬─────────┬──────────┬────────┬──────────┬──────────────┐
//! │ SYNC      │ COMMAND │ SEQUENCE │ LENGTH │ CHECKSUM │ PAYLOAD      │
//! │ FE CA     │ 4B      │ 4B       │ 4B     │ 4B       │ 0–32768B     │
//! └───────────┴─────────┴──────────┴────────┴──────────┴──────────────┘
//! ```
//!
//! The checksum is a CRC-32 over header and payload with the checksum field
//! zeroed. A reply carries the sequence number of the request it answers.
//! Payloads are arrays of little-endian `u32` words.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod crc;
pub mod frame;
pub mod sequence;
pub mod words;

pub use command::Command;
pub use crc::crc32;
pub use frame::{Frame, FrameError, FrameHeader, HEADER_LEN, MAX_PAYLOAD_SIZE, SYNC};
pub use sequence::SequenceGate;
pub use words::{Args, ReplyBuilder, NOT_FOUND};
