//! Baud rate table
//!
//! Bit times are stored in hundredths of a microsecond so autobaud can
//! compare against them in integer arithmetic.

/// One standard baud rate and its bit period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudRate {
    /// Bits per second
    pub baud: u32,
    /// Bit period in units of 0.01 µs
    pub bit_time_x100: u32,
}

impl BaudRate {
    /// Derive the bit period of `baud`, rounded to the nearest 0.01 µs
    pub const fn new(baud: u32) -> Self {
        Self {
            baud,
            bit_time_x100: (100_000_000 + baud / 2) / baud,
        }
    }

    /// Bit period rounded to whole microseconds (at least 1)
    pub fn bit_time_us(&self) -> u32 {
        ((self.bit_time_x100 + 50) / 100).max(1)
    }
}

/// Ordered, immutable list of baud rates
#[derive(Debug, Clone, Copy)]
pub struct BaudTable<'a> {
    entries: &'a [BaudRate],
}

impl<'a> BaudTable<'a> {
    /// Wrap a list of rates
    pub const fn new(entries: &'a [BaudRate]) -> Self {
        Self { entries }
    }

    /// Number of rates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rate at `index`
    pub fn get(&self, index: usize) -> Option<&'a BaudRate> {
        self.entries.get(index)
    }

    /// Index of the entry for `baud`
    pub fn index_of(&self, baud: u32) -> Option<usize> {
        self.entries.iter().position(|rate| rate.baud == baud)
    }

    /// Entry whose bit time is closest to `bit_time_x100`
    ///
    /// Ties resolve to the earlier (slower) entry.
    pub fn nearest(&self, bit_time_x100: u32) -> Option<(usize, &'a BaudRate)> {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, rate)| rate.bit_time_x100.abs_diff(bit_time_x100))
    }

    /// Iterate over all rates
    pub fn iter(&self) -> impl Iterator<Item = &'a BaudRate> {
        self.entries.iter()
    }
}

const STANDARD_RATES: [BaudRate; 13] = [
    BaudRate::new(300),
    BaudRate::new(600),
    BaudRate::new(1200),
    BaudRate::new(2400),
    BaudRate::new(4800),
    BaudRate::new(9600),
    BaudRate::new(14400),
    BaudRate::new(19200),
    BaudRate::new(28800),
    BaudRate::new(38400),
    BaudRate::new(57600),
    BaudRate::new(115200),
    BaudRate::new(230400),
];

/// Rates commonly found on debug consoles
pub const STANDARD_BAUD_TABLE: BaudTable<'static> = BaudTable::new(&STANDARD_RATES);
