//! BUSSide Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the bridge logic is written
//! against. Chip-specific crates implement them for real silicon, and the
//! core crate's tests implement them with synthetic clocks and lines so the
//! timing-sensitive code can run on a host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  busside-core / busside-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  busside-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ busside-hal-  │       │  host tests   │
//! │    rp2040     │       │ (sim clocks)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`], [`gpio::OutputPin`], [`gpio::PinBank`] - Digital I/O
//! - [`uart::HostLink`], [`uart::SerialChannel`] - Serial communication
//! - [`clock::MonotonicClock`] - High-resolution time base
//! - [`watchdog::Watchdog`] - Hardware watchdog acknowledgement

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod uart;
pub mod watchdog;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use gpio::{BankPin, InputPin, OutputPin, PinBank};
pub use uart::{HostLink, Parity, SerialChannel, StopBits};
pub use watchdog::Watchdog;
