//! Signal capture
//!
//! Records the widths of alternating levels on an input pin. The resulting
//! [`PulseWidths`] is laid out as:
//!
//! - `[0]` starting level (`1` = high, the UART rest level)
//! - `[1]` the part of the idle interval that elapsed after the idle
//!   precondition was met
//! - even indices from 2: low intervals, the first being a start bit
//! - odd indices from 3: high intervals
//!
//! Polling compares against the expected level, so a missed pair of edges
//! shortens the record but never swaps the level each index stands for.

use busside_hal::{InputPin, MonotonicClock, Watchdog};

use crate::config::{CaptureConfig, MAX_PULSES};

/// Interval widths in microseconds from one capture
pub type PulseWidths = heapless::Vec<u32, MAX_PULSES>;

/// Value stored in `[0]` when the capture started on a high line
pub const LEVEL_HIGH: u32 = 1;

/// Errors that end a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// The line never rested high long enough
    IdleTimeout,
    /// The line stopped changing mid-capture
    SymbolTimeout,
}

/// Busy-wait until `pin` has been high for `idle_us`
///
/// Returns the tick at which the precondition was met. The watchdog is fed
/// while the line is seen low, which is when traffic is present.
pub fn wait_for_idle<P, C, W>(
    pin: &P,
    clock: &C,
    watchdog: &mut W,
    idle_us: u64,
    timeout_us: u64,
) -> Result<u64, CaptureError>
where
    P: InputPin,
    C: MonotonicClock,
    W: Watchdog,
{
    let idle_ticks = clock.us_to_ticks(idle_us);
    let timeout_ticks = clock.us_to_ticks(timeout_us);
    let start = clock.now_ticks();
    let mut high_since = start;

    loop {
        let now = clock.now_ticks();
        if pin.is_low() {
            high_since = now;
            watchdog.feed();
        } else if now.saturating_sub(high_since) >= idle_ticks {
            return Ok(now);
        }
        if now.saturating_sub(start) >= timeout_ticks {
            return Err(CaptureError::IdleTimeout);
        }
    }
}

/// Capture interval widths from `pin` into `out`
///
/// `bit_time_us` is the currently assumed bit period and only scales the
/// idle precondition. On error `out` holds whatever was recorded so far.
pub fn capture<P, C, W>(
    pin: &P,
    clock: &C,
    watchdog: &mut W,
    bit_time_us: u32,
    config: &CaptureConfig,
    out: &mut PulseWidths,
) -> Result<(), CaptureError>
where
    P: InputPin,
    C: MonotonicClock,
    W: Watchdog,
{
    out.clear();
    let wanted = config.samples.clamp(3, MAX_PULSES);
    let idle_us = u64::from(bit_time_us) * u64::from(config.idle_bit_periods);
    let idle_timeout_us = u64::from(config.idle_timeout_ms) * 1000;
    let symbol_ticks = clock.us_to_ticks(u64::from(config.symbol_timeout_ms) * 1000);

    let mut last_edge = wait_for_idle(pin, clock, watchdog, idle_us, idle_timeout_us)?;
    let mut level = true;
    // Capacity is at least three, these cannot fail.
    let _ = out.push(LEVEL_HIGH);
    watchdog.feed();

    while out.len() < wanted {
        let edge = loop {
            let now = clock.now_ticks();
            if pin.is_high() != level {
                break now;
            }
            if now.saturating_sub(last_edge) >= symbol_ticks {
                debug!("capture: no edge after {} samples", out.len());
                return Err(CaptureError::SymbolTimeout);
            }
        };

        let width = clock.ticks_to_us_rounded(edge - last_edge);
        if out.push(u32::try_from(width).unwrap_or(u32::MAX)).is_err() {
            break;
        }
        level = !level;
        last_edge = edge;
        watchdog.feed();
    }

    trace!("capture: {} samples", out.len());
    Ok(())
}
