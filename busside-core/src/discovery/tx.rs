//! TX-pin discovery
//!
//! With the receive line known, each remaining pin is driven as a transmit
//! line in turn and sent a couple of line endings. A console on the other
//! side answers with a prompt, which shows up as printable text on RX.

use busside_hal::{MonotonicClock, PinBank, SerialChannel, Watchdog};

use crate::config::TxProbeConfig;

fn is_console_byte(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E | b'\r' | b'\n')
}

/// Find the pin that makes a console on `rx` answer
///
/// Every probed pin is released to a floating input before the next one is
/// tried and before returning.
pub fn discover_tx<B, S, C, W>(
    bank: &mut B,
    serial: &mut S,
    clock: &C,
    watchdog: &mut W,
    rx: usize,
    baud: u32,
    config: &TxProbeConfig,
) -> Option<usize>
where
    B: PinBank,
    S: SerialChannel<B>,
    C: MonotonicClock,
    W: Watchdog,
{
    if !bank.contains(rx) || baud == 0 {
        return None;
    }
    bank.set_input(rx);

    for candidate in (0..bank.len()).filter(|&pin| pin != rx) {
        watchdog.feed();
        bank.set_output(candidate, true);
        serial.set_baud(baud);
        serial.discard_input(bank, rx);
        serial.write(bank, candidate, config.probe);

        let answered = listen(bank, serial, clock, watchdog, rx, config);
        bank.set_input(candidate);

        if answered {
            info!("tx: pin {} answers on rx {}", candidate, rx);
            return Some(candidate);
        }
        debug!("tx: pin {} silent", candidate);
    }
    None
}

fn listen<B, S, C, W>(bank: &B, serial: &mut S, clock: &C, watchdog: &mut W, rx: usize, config: &TxProbeConfig) -> bool
where
    B: PinBank,
    S: SerialChannel<B>,
    C: MonotonicClock,
    W: Watchdog,
{
    let start = clock.now_us();
    let window = u64::from(config.listen_ms) * 1000;
    let mut run = 0u8;

    loop {
        let elapsed = clock.now_us().saturating_sub(start);
        if elapsed >= window {
            return false;
        }
        let remaining = u32::try_from(window - elapsed).unwrap_or(u32::MAX);
        let Some(byte) = serial.read_byte(bank, rx, remaining) else {
            return false;
        };
        watchdog.feed();

        if is_console_byte(byte) {
            run = run.saturating_add(1);
            if run >= config.min_printable {
                return true;
            }
        } else {
            run = 0;
        }
    }
}
