//! Configuration type definitions

use super::baud::{BaudTable, STANDARD_BAUD_TABLE};

/// Maximum number of intervals a capture can hold
pub const MAX_PULSES: usize = 200;

/// Host link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Time allowed for the header, and again for the payload (ms)
    pub header_timeout_ms: u32,
}

impl LinkConfig {
    pub const DEFAULT: Self = Self {
        header_timeout_ms: 1000,
    };
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Signal capture limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureConfig {
    /// Intervals to record, including the two leading entries (≤ [`MAX_PULSES`])
    pub samples: usize,
    /// Bit periods of continuous idle required before sampling
    pub idle_bit_periods: u32,
    /// Give up waiting for idle after this long (ms)
    pub idle_timeout_ms: u32,
    /// Give up when no transition arrives for this long (ms)
    pub symbol_timeout_ms: u32,
}

impl CaptureConfig {
    pub const DEFAULT: Self = Self {
        samples: MAX_PULSES,
        idle_bit_periods: 10,
        idle_timeout_ms: 2000,
        symbol_timeout_ms: 5000,
    };
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How many stop-bit violations a frame-size candidate may have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBitTolerance {
    /// Every walked frame must land its stop bits on the high level
    Strict,
    /// At least this percentage of walked frames must
    MinMatchPercent(u8),
}

impl StopBitTolerance {
    /// Whether `violations` out of `frames` is acceptable
    pub fn accepts(self, frames: usize, violations: usize) -> bool {
        match self {
            StopBitTolerance::Strict => violations == 0,
            StopBitTolerance::MinMatchPercent(percent) => {
                let matched = frames.saturating_sub(violations);
                matched * 100 >= usize::from(percent) * frames
            }
        }
    }
}

/// Frame-structure inference tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InferenceConfig {
    /// Total frame bit counts to try, in order (0 marks an unused slot)
    pub frame_bit_candidates: [u8; 7],
    /// Frames walked per candidate
    pub max_frames: usize,
    /// Complete frames required before a candidate can be accepted
    pub min_frames: usize,
    /// Tolerance of the first pass
    pub tolerance: StopBitTolerance,
    /// Tolerance of the second pass, tried when the first accepts nothing
    pub fallback: Option<StopBitTolerance>,
    /// Classified frames required before parity is decided
    pub min_parity_frames: usize,
    /// Share of frames (percent) that must agree on a parity sum
    pub parity_majority_percent: u8,
}

impl InferenceConfig {
    pub const DEFAULT: Self = Self {
        frame_bit_candidates: [10, 11, 9, 8, 7, 12, 13],
        max_frames: 30,
        min_frames: 3,
        tolerance: StopBitTolerance::Strict,
        fallback: Some(StopBitTolerance::MinMatchPercent(80)),
        min_parity_frames: 5,
        parity_majority_percent: 70,
    };
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Line-activity sampling windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityConfig {
    /// Histogram window for data discovery (ms)
    pub window_ms: u32,
    /// Short window used before characterizing a pin (ms)
    pub probe_window_ms: u32,
    /// Watchdog cadence while nothing toggles (ms)
    pub feed_interval_ms: u32,
}

impl ActivityConfig {
    pub const DEFAULT: Self = Self {
        window_ms: 5000,
        probe_window_ms: 250,
        feed_interval_ms: 100,
    };
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Line characterization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    /// Capture attempts per pin
    pub attempts: u8,
    /// Baud assumed for the idle precondition until one is measured
    pub initial_baud: u32,
}

impl LineConfig {
    pub const DEFAULT: Self = Self {
        attempts: 3,
        initial_baud: 9600,
    };
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// TX-pin probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxProbeConfig {
    /// Bytes sent on each candidate
    pub probe: &'static [u8],
    /// How long to listen for an answer (ms)
    pub listen_ms: u32,
    /// Consecutive printable bytes that identify a console
    pub min_printable: u8,
}

impl TxProbeConfig {
    pub const DEFAULT: Self = Self {
        probe: b"\r\n\r\n",
        listen_ms: 500,
        min_printable: 2,
    };
}

impl Default for TxProbeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Interactive bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassthroughConfig {
    /// Host byte that ends bridging (CAN, Ctrl-X)
    pub escape: u8,
    /// Line written to the host once bridging ends
    pub exit_banner: &'static [u8],
    /// Receive poll budget per loop iteration (µs)
    pub rx_poll_us: u32,
}

impl PassthroughConfig {
    pub const DEFAULT: Self = Self {
        escape: 24,
        exit_banner: b"BUSSIDE_EXIT_UART_PASSTHROUGH\r\n",
        rx_poll_us: 100,
    };
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    /// Baud rates autobaud chooses from
    pub baud_table: BaudTable<'static>,
    pub link: LinkConfig,
    pub capture: CaptureConfig,
    pub inference: InferenceConfig,
    pub activity: ActivityConfig,
    pub line: LineConfig,
    pub tx_probe: TxProbeConfig,
    pub passthrough: PassthroughConfig,
}

/// Configuration used by the firmware
pub const DEFAULT_CONFIG: DeviceConfig = DeviceConfig {
    baud_table: STANDARD_BAUD_TABLE,
    link: LinkConfig::DEFAULT,
    capture: CaptureConfig::DEFAULT,
    inference: InferenceConfig::DEFAULT,
    activity: ActivityConfig::DEFAULT,
    line: LineConfig::DEFAULT,
    tx_probe: TxProbeConfig::DEFAULT,
    passthrough: PassthroughConfig::DEFAULT,
};

impl Default for DeviceConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
