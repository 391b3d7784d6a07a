//! RP2040-specific HAL for the BUSSide bridge
//!
//! Implements the `busside-hal` traits on top of `embassy-rp`:
//!
//! - Candidate pin bank over `Flex` GPIOs
//! - Host link over a buffered hardware UART
//! - Monotonic clock over the embassy time driver
//! - Hardware watchdog

#![no_std]

pub mod clock;
pub mod gpio;
pub mod uart;
pub mod watchdog;

pub use clock::TimerClock;
pub use gpio::FlexBank;
pub use uart::UartLink;
pub use watchdog::HwWatchdog;
