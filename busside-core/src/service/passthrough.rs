//! Interactive bridge between the host and a UART on the audited bus

use busside_hal::{HostLink, PinBank, SerialChannel, Watchdog};

use crate::config::PassthroughConfig;

/// Pins and rate of a bridge session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassthroughRequest {
    pub rx: usize,
    /// `None` bridges receive-only
    pub tx: Option<usize>,
    pub baud: u32,
}

/// Shuttle bytes until the host sends the escape byte
///
/// The TX pin is released on every exit, including a failed host write.
/// The exit banner follows a clean escape.
pub fn bridge<L, B, S, W>(
    link: &mut L,
    bank: &mut B,
    serial: &mut S,
    watchdog: &mut W,
    request: &PassthroughRequest,
    config: &PassthroughConfig,
) -> Result<(), L::Error>
where
    L: HostLink,
    B: PinBank,
    S: SerialChannel<B>,
    W: Watchdog,
{
    let tx = request.tx.filter(|&pin| bank.contains(pin) && pin != request.rx);
    bank.set_input(request.rx);
    if let Some(pin) = tx {
        bank.set_output(pin, true);
    }
    serial.set_baud(request.baud);
    info!("passthrough: rx {} tx {:?} at {}", request.rx, tx, request.baud);

    let result = shuttle(link, bank, serial, watchdog, request.rx, tx, config);

    if let Some(pin) = tx {
        bank.set_input(pin);
    }
    result?;
    link.write_all(config.exit_banner)?;
    link.flush()
}

fn shuttle<L, B, S, W>(
    link: &mut L,
    bank: &mut B,
    serial: &mut S,
    watchdog: &mut W,
    rx: usize,
    tx: Option<usize>,
    config: &PassthroughConfig,
) -> Result<(), L::Error>
where
    L: HostLink,
    B: PinBank,
    S: SerialChannel<B>,
    W: Watchdog,
{
    loop {
        watchdog.feed();
        if let Some(byte) = link.read_byte() {
            if byte == config.escape {
                return Ok(());
            }
            if let Some(pin) = tx {
                serial.write(bank, pin, &[byte]);
            }
        }
        if let Some(byte) = serial.read_byte(bank, rx, config.rx_poll_us) {
            link.write_all(&[byte])?;
        }
    }
}
