//! Host link over a buffered hardware UART

use busside_hal::HostLink;
use embedded_io::{Read, ReadReady, Write};

/// Byte stream to the host over any `embedded-io` UART
///
/// Reads only consume bytes already buffered by the interrupt handler.
pub struct UartLink<U> {
    uart: U,
}

impl<U> UartLink<U>
where
    U: Read + ReadReady + Write,
{
    pub fn new(uart: U) -> Self {
        Self { uart }
    }
}

impl<U> HostLink for UartLink<U>
where
    U: Read + ReadReady + Write,
{
    type Error = U::Error;

    fn read_byte(&mut self) -> Option<u8> {
        if !self.uart.read_ready().unwrap_or(false) {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        Write::write_all(&mut self.uart, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(&mut self.uart)
    }
}
