//! Autobaud estimation
//!
//! The shortest interval in a stretch of UART traffic is one bit period.
//! Taking the minimum of several fixed-size chunks and averaging those
//! minimums rejects both glitches and long runs of equal bits.

use crate::capture::PulseWidths;
use crate::config::{BaudRate, BaudTable};

/// Intervals per chunk
pub const CHUNK_LEN: usize = 15;

/// Leading entries of a capture that are not bit intervals
pub const SKIPPED_SAMPLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutobaudError {
    /// Too few samples, or every chunk minimum was zero
    Unresolved,
}

/// Selected baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudEstimate {
    /// Index of the selected entry in the table
    pub index: usize,
    /// The selected entry
    pub rate: BaudRate,
    /// Measured bit time in 0.01 µs
    pub measured_x100: u32,
}

/// Average of per-chunk minimum widths, in 0.01 µs
pub fn measure_bit_time_x100(samples: &[u32]) -> Option<u32> {
    let intervals = samples.get(SKIPPED_SAMPLES..)?;
    let (sum, chunks) = intervals
        .chunks_exact(CHUNK_LEN)
        .filter_map(|chunk| chunk.iter().copied().min())
        .fold((0u64, 0u64), |(sum, n), min| (sum + u64::from(min), n + 1));

    if chunks == 0 {
        return None;
    }
    let average = sum * 100 / chunks;
    u32::try_from(average).ok().filter(|&avg| avg != 0)
}

/// Pick the table entry closest to the measured bit time
pub fn estimate(samples: &PulseWidths, table: &BaudTable<'_>) -> Result<BaudEstimate, AutobaudError> {
    let measured_x100 = measure_bit_time_x100(samples).ok_or(AutobaudError::Unresolved)?;
    let (index, rate) = table
        .nearest(measured_x100)
        .ok_or(AutobaudError::Unresolved)?;

    debug!("autobaud: {} x0.01us -> {} baud", measured_x100, rate.baud);
    Ok(BaudEstimate {
        index,
        rate: *rate,
        measured_x100,
    })
}
