//! Board-agnostic core logic for the BUSSide bridge firmware
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Configuration (baud table, capture and inference tuning)
//! - Signal capture on an input pin
//! - Autobaud estimation and frame-structure inference
//! - UART discovery on candidate pins (activity, line settings, TX pin)
//! - The request/reply service loop and the passthrough bridge
//!
//! Hardware is reached only through the `busside-hal` traits, so the timing
//! code runs unchanged against the synthetic clocks and lines of the unit
//! tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod autobaud;
pub mod capture;
pub mod config;
pub mod discovery;
pub mod framing;
pub mod service;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{DeviceConfig, DEFAULT_CONFIG};
pub use service::{Peripherals, Served, Service};
pub use traits::StatusIndicator;
