//! Embassy tasks
//!
//! The bridge runs a single task that never yields: every command is a
//! bounded busy-wait against the timer.

pub mod service;

pub use service::{service_task, BoardPeripherals, HostUart};
