//! Hardware driver implementations
//!
//! Concrete implementations of the traits the bridge logic is written
//! against:
//!
//! - Bit-banged UART over any two pins of a pin bank
//! - Blinking status LED
//! - Adapter from `embedded-hal` output pins

#![no_std]
#![deny(unsafe_code)]

pub mod led;
pub mod pin;
pub mod soft_serial;

pub use led::Blinker;
pub use pin::EhOutput;
pub use soft_serial::SoftSerial;
