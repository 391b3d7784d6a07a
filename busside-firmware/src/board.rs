//! Board pin mapping
//!
//! Layout of an RP2040 Pico wired as a bus probe: UART0 on GPIO0/1 talks to
//! the host, GPIO2..=GPIO10 are the candidate lines clipped onto the target,
//! and the on-board LED on GPIO25 shows status.

use embassy_rp::gpio::{AnyPin, Flex};
use embassy_rp::Peri;

use busside_hal_rp2040::FlexBank;

/// Host link bit rate
pub const HOST_BAUD: u32 = 500_000;

/// Number of candidate lines
pub const CANDIDATE_COUNT: usize = 9;

/// GPIO numbers of the candidate lines, in bank index order
pub const CANDIDATE_GPIOS: [u8; CANDIDATE_COUNT] = [2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Watchdog timeout; must exceed the longest unfed wait (symbol timeout)
pub const WATCHDOG_TIMEOUT_MS: u64 = 8_000;

/// Initial rate of the soft serial channel
pub const SOFT_SERIAL_BAUD: u32 = 9600;

/// Candidate pin bank type
pub type CandidateBank = FlexBank<CANDIDATE_COUNT>;

/// Build the candidate bank, indices following [`CANDIDATE_GPIOS`]
pub fn candidate_bank(pins: [Peri<'static, AnyPin>; CANDIDATE_COUNT]) -> CandidateBank {
    FlexBank::new(pins.map(Flex::new))
}
