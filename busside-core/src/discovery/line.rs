//! Line characterization
//!
//! Runs capture, autobaud and frame inference on candidate pins and keeps
//! the last measured baud rate so later captures wait for a realistic idle
//! period.

use busside_hal::{BankPin, MonotonicClock, PinBank, Watchdog};

use super::activity::{ActivityMonitor, MAX_PINS};
use crate::autobaud::{self, AutobaudError};
use crate::capture::{self, CaptureError, PulseWidths};
use crate::config::DeviceConfig;
use crate::framing::{self, FrameShape, InferenceError};

/// Why a pin could not be characterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscoveryError {
    IdleTimeout,
    SymbolTimeout,
    BaudUnresolved,
    FrameSizeUnresolved,
    /// The pin never changed level
    NoActivity,
    /// The pin index is not in the bank
    InvalidPin,
}

impl DiscoveryError {
    /// Status word reported to the host
    pub fn code(self) -> i32 {
        match self {
            DiscoveryError::IdleTimeout => -1,
            DiscoveryError::SymbolTimeout => -2,
            DiscoveryError::BaudUnresolved => -3,
            DiscoveryError::FrameSizeUnresolved => -4,
            DiscoveryError::NoActivity => -5,
            DiscoveryError::InvalidPin => -6,
        }
    }
}

impl From<CaptureError> for DiscoveryError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::IdleTimeout => DiscoveryError::IdleTimeout,
            CaptureError::SymbolTimeout => DiscoveryError::SymbolTimeout,
        }
    }
}

impl From<AutobaudError> for DiscoveryError {
    fn from(_: AutobaudError) -> Self {
        DiscoveryError::BaudUnresolved
    }
}

impl From<InferenceError> for DiscoveryError {
    fn from(_: InferenceError) -> Self {
        DiscoveryError::FrameSizeUnresolved
    }
}

/// Baud rate and frame layout of a UART line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSettings {
    pub baud: u32,
    pub shape: FrameShape,
}

/// Outcome for one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineReport {
    pub pin: usize,
    pub toggles: u32,
    pub outcome: Result<LineSettings, DiscoveryError>,
}

/// Characterizes UART lines on bank pins
pub struct LineCharacterizer<'c> {
    config: &'c DeviceConfig,
    baud_index: usize,
}

impl<'c> LineCharacterizer<'c> {
    pub fn new(config: &'c DeviceConfig) -> Self {
        let baud_index = config
            .baud_table
            .index_of(config.line.initial_baud)
            .unwrap_or(0);
        Self { config, baud_index }
    }

    /// Baud rate currently assumed for the idle precondition
    pub fn assumed_baud(&self) -> u32 {
        self.config
            .baud_table
            .get(self.baud_index)
            .map_or(self.config.line.initial_baud, |rate| rate.baud)
    }

    fn assumed_bit_time_us(&self) -> u32 {
        self.config
            .baud_table
            .get(self.baud_index)
            .map_or(1_000_000 / self.config.line.initial_baud.max(1), |rate| {
                rate.bit_time_us()
            })
    }

    /// One capture, autobaud and inference pass on pin `index`
    pub fn measure<B, C, W>(
        &mut self,
        bank: &B,
        index: usize,
        clock: &C,
        watchdog: &mut W,
    ) -> Result<LineSettings, DiscoveryError>
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        let pin = BankPin::new(bank, index);
        let mut samples = PulseWidths::new();
        capture::capture(
            &pin,
            clock,
            watchdog,
            self.assumed_bit_time_us(),
            &self.config.capture,
            &mut samples,
        )?;

        let estimate = autobaud::estimate(&samples, &self.config.baud_table)?;
        self.baud_index = estimate.index;

        let shape = framing::infer_frame(&samples, estimate.rate.bit_time_x100, &self.config.inference)?;
        Ok(LineSettings {
            baud: estimate.rate.baud,
            shape,
        })
    }

    /// Measure pin `index` up to the configured number of attempts
    ///
    /// Returns the first success or the last error.
    pub fn measure_with_retries<B, C, W>(
        &mut self,
        bank: &B,
        index: usize,
        clock: &C,
        watchdog: &mut W,
    ) -> Result<LineSettings, DiscoveryError>
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        let mut result = Err(DiscoveryError::NoActivity);
        for attempt in 0..self.config.line.attempts.max(1) {
            watchdog.feed();
            result = self.measure(bank, index, clock, watchdog);
            match result {
                Ok(_) => break,
                Err(err) => debug!("pin {}: attempt {} failed: {:?}", index, attempt, err),
            }
        }
        result
    }

    /// Characterize a single pin
    pub fn line_settings<B, C, W>(
        &mut self,
        bank: &mut B,
        index: usize,
        clock: &C,
        watchdog: &mut W,
    ) -> LineReport
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        if !bank.contains(index) {
            return LineReport {
                pin: index,
                toggles: 0,
                outcome: Err(DiscoveryError::InvalidPin),
            };
        }

        let mut monitor = ActivityMonitor::single(index);
        self.sample_activity(&mut monitor, bank, clock, watchdog);
        self.report(bank, index, monitor.toggles(index), clock, watchdog)
    }

    /// Characterize every pin that shows activity
    pub fn all_line_settings<B, C, W>(
        &mut self,
        bank: &mut B,
        clock: &C,
        watchdog: &mut W,
    ) -> heapless::Vec<LineReport, MAX_PINS>
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        let mut monitor = ActivityMonitor::all(bank);
        self.sample_activity(&mut monitor, bank, clock, watchdog);

        let mut reports = heapless::Vec::new();
        for (index, toggles) in monitor.iter() {
            let report = self.report(bank, index, toggles, clock, watchdog);
            if reports.push(report).is_err() {
                break;
            }
        }
        reports
    }

    fn sample_activity<B, C, W>(&self, monitor: &mut ActivityMonitor, bank: &mut B, clock: &C, watchdog: &mut W)
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        let activity = &self.config.activity;
        monitor.run(
            bank,
            clock,
            watchdog,
            u64::from(activity.probe_window_ms) * 1000,
            u64::from(activity.feed_interval_ms) * 1000,
        );
    }

    fn report<B, C, W>(&mut self, bank: &B, index: usize, toggles: u32, clock: &C, watchdog: &mut W) -> LineReport
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        let outcome = if toggles == 0 {
            Err(DiscoveryError::NoActivity)
        } else {
            self.measure_with_retries(bank, index, clock, watchdog)
        };
        match outcome {
            Ok(settings) => info!(
                "pin {}: {} baud, {} data bits, {:?} parity",
                index,
                settings.baud,
                settings.shape.data_bits,
                settings.shape.parity
            ),
            Err(DiscoveryError::NoActivity) => {}
            Err(err) => warn!("pin {}: {} toggles, inconclusive: {:?}", index, toggles, err),
        }
        LineReport {
            pin: index,
            toggles,
            outcome,
        }
    }
}
