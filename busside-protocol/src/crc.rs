//! CRC-32 (IEEE 802.3, reflected) using a 16-entry nibble table
//!
//! The nibble table trades a little speed for 64 bytes of flash instead of
//! the 1 KiB a byte-wide table needs.

/// Reflected polynomial 0xEDB88320 processed four bits at a time
const NIBBLE_TABLE: [u32; 16] = [
    0x0000_0000, 0x1DB7_1064, 0x3B6E_20C8, 0x26D9_30AC,
    0x76DC_4190, 0x6B6B_51F4, 0x4DB2_6158, 0x5005_713C,
    0xEDB8_8320, 0xF00F_9344, 0xD6D6_A3E8, 0xCB61_B38C,
    0x9B64_C2B0, 0x86D3_D2D4, 0xA00A_E278, 0xBDBD_F21C,
];

/// Incremental CRC-32 state
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Start a new checksum
    pub const fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Feed bytes into the checksum
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;
        for &byte in data {
            crc = NIBBLE_TABLE[((crc ^ u32::from(byte)) & 0x0F) as usize] ^ (crc >> 4);
            crc = NIBBLE_TABLE[((crc ^ u32::from(byte >> 4)) & 0x0F) as usize] ^ (crc >> 4);
        }
        self.state = crc;
    }

    /// Final checksum value
    pub fn finish(self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }
}

/// CRC-32 of a single buffer
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finish()
}
