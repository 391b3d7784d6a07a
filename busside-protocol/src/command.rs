//! Command tags
//!
//! Tags are shared with the host tool. Odd values name bus operations; the
//! numbering has gaps where the host reserves tags.

/// Commands a request frame can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Echo the request payload back
    Echo,
    /// Characterize the UART on one pin
    UartLineSettings,
    /// Characterize every candidate pin
    UartLineSettingsAll,
    /// Count signal changes on every candidate pin
    UartDataDiscover,
    /// Bridge the host to a UART on the audited bus
    UartPassthrough,
    /// Locate the transmit line paired with a known receive line
    UartTxDiscover,
    /// Set the status LED blink interval
    LedBlink,
    /// SPI flash dump
    SpiDump,
    /// Raw SPI command
    SpiCommand,
    /// SPI flash identification
    SpiReadId,
    /// SPI flash sector erase
    SpiEraseSector,
    /// SPI pinout discovery
    SpiDiscoverPinout,
    /// Bit-banged SPI flash identification
    SpiBitbangReadId,
    /// SPI command fuzzing
    SpiFuzz,
    /// SPI flash write
    SpiWrite,
    /// SPI flash write-protect disable
    SpiWriteProtectDisable,
    /// SPI flash write-protect enable
    SpiWriteProtectEnable,
    /// I2C slave discovery
    I2cDiscoverSlaves,
    /// I2C EEPROM dump
    I2cDump,
    /// I2C pinout discovery
    I2cDiscoverPinout,
    /// I2C EEPROM write
    I2cWrite,
    /// JTAG pinout discovery
    JtagDiscoverPinout,
}

impl Command {
    /// Decode a wire tag
    pub fn from_tag(tag: u32) -> Option<Self> {
        let command = match tag {
            0 => Command::Echo,
            1 => Command::SpiDump,
            3 => Command::SpiCommand,
            5 => Command::I2cDiscoverSlaves,
            7 => Command::UartLineSettings,
            9 => Command::I2cDump,
            11 => Command::UartLineSettingsAll,
            13 => Command::JtagDiscoverPinout,
            15 => Command::UartDataDiscover,
            17 => Command::SpiReadId,
            19 => Command::UartPassthrough,
            21 => Command::UartTxDiscover,
            23 => Command::I2cDiscoverPinout,
            25 => Command::I2cWrite,
            27 => Command::SpiEraseSector,
            29 => Command::SpiDiscoverPinout,
            31 => Command::SpiBitbangReadId,
            35 => Command::SpiFuzz,
            37 => Command::SpiWrite,
            39 => Command::SpiWriteProtectDisable,
            41 => Command::SpiWriteProtectEnable,
            45 => Command::LedBlink,
            _ => return None,
        };
        Some(command)
    }

    /// Wire tag for this command
    pub fn tag(self) -> u32 {
        match self {
            Command::Echo => 0,
            Command::SpiDump => 1,
            Command::SpiCommand => 3,
            Command::I2cDiscoverSlaves => 5,
            Command::UartLineSettings => 7,
            Command::I2cDump => 9,
            Command::UartLineSettingsAll => 11,
            Command::JtagDiscoverPinout => 13,
            Command::UartDataDiscover => 15,
            Command::SpiReadId => 17,
            Command::UartPassthrough => 19,
            Command::UartTxDiscover => 21,
            Command::I2cDiscoverPinout => 23,
            Command::I2cWrite => 25,
            Command::SpiEraseSector => 27,
            Command::SpiDiscoverPinout => 29,
            Command::SpiBitbangReadId => 31,
            Command::SpiFuzz => 35,
            Command::SpiWrite => 37,
            Command::SpiWriteProtectDisable => 39,
            Command::SpiWriteProtectEnable => 41,
            Command::LedBlink => 45,
        }
    }
}
