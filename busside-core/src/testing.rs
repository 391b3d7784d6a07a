//! Host-side doubles for the hardware traits

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::Cell;

use busside_hal::{HostLink, InputPin, MonotonicClock, Parity, PinBank, SerialChannel, StopBits, Watchdog};

use crate::capture::{PulseWidths, LEVEL_HIGH};

/// Boot banner with balanced byte parity (12 of 25 bytes odd)
pub const BANNER: &[u8] = concat!(
    "U-Boot 2023.04 (Jan 01)\r\n",
    "U-Boot 2023.04 (Jan 01)\r\n",
    "U-Boot 2023.04 (Jan 01)\r\n",
    "U-Boot 2023.04 (Jan 01)\r\n",
)
.as_bytes();

/// Clock rate used for synthetic captures
const CAPTURE_TPU: u32 = 1000;

/// Shell prompt as a console prints it, with unbalanced byte parity
pub const LOGIN_PROMPT: &[u8] = b"login: ";

/// Clock that advances by `step` ticks every time it is read
pub struct SimClock {
    now: Cell<u64>,
    ticks_per_us: u32,
    step: u64,
}

impl SimClock {
    pub fn new(ticks_per_us: u32, step: u64) -> Self {
        Self {
            now: Cell::new(0),
            ticks_per_us,
            step,
        }
    }

    /// Current tick without advancing
    pub fn peek(&self) -> u64 {
        self.now.get()
    }

    pub fn advance(&self, ticks: u64) {
        self.now.set(self.now.get() + ticks);
    }
}

impl MonotonicClock for SimClock {
    fn now_ticks(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }

    fn ticks_per_us(&self) -> u32 {
        self.ticks_per_us
    }
}

/// Digital level over time, as a starting level plus edge ticks
#[derive(Debug, Clone)]
pub struct Waveform {
    initial: bool,
    edges: Vec<u64>,
}

impl Waveform {
    pub fn constant(level: bool) -> Self {
        Self {
            initial: level,
            edges: Vec::new(),
        }
    }

    pub fn level_at(&self, tick: u64) -> bool {
        let passed = self.edges.partition_point(|&edge| edge <= tick);
        self.initial ^ (passed % 2 == 1)
    }

    pub fn edges(&self) -> &[u64] {
        &self.edges
    }

    /// Invert the level over `[from, to)`
    pub fn insert_pulse(&mut self, from: u64, to: u64) {
        let at = self.edges.partition_point(|&edge| edge < from);
        self.edges.insert(at, from);
        self.edges.insert(at + 1, to);
    }
}

/// UART transmitter model producing waveforms from bytes
#[derive(Debug, Clone, Copy)]
pub struct UartSignal {
    pub baud: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Idle bit periods before the first byte
    pub lead_idle_bits: u32,
    /// Insert an idle gap after every this many bytes (0 = never)
    pub gap_every: usize,
    pub gap_bits: u32,
}

impl UartSignal {
    pub fn new(baud: u32, data_bits: u8, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            baud,
            data_bits,
            parity,
            stop_bits,
            lead_idle_bits: 20,
            gap_every: 25,
            gap_bits: 15,
        }
    }

    /// Line level for every bit period
    pub fn levels(&self, bytes: &[u8]) -> Vec<bool> {
        let mut levels = Vec::new();
        levels.resize(self.lead_idle_bits as usize, true);
        for (i, &byte) in bytes.iter().enumerate() {
            levels.push(false);
            let mut ones = 0;
            for bit in 0..self.data_bits {
                let high = (byte >> bit) & 1 == 1;
                ones += u32::from(high);
                levels.push(high);
            }
            match self.parity {
                Parity::None => {}
                Parity::Even => levels.push(ones % 2 == 1),
                Parity::Odd => levels.push(ones % 2 == 0),
            }
            for _ in 0..self.stop_bits.count() {
                levels.push(true);
            }
            if self.gap_every != 0 && (i + 1) % self.gap_every == 0 {
                for _ in 0..self.gap_bits {
                    levels.push(true);
                }
            }
        }
        levels.push(true);
        levels
    }

    /// Waveform in ticks of a clock running at `ticks_per_us`
    pub fn waveform(&self, bytes: &[u8], ticks_per_us: u32) -> Waveform {
        let tick_hz = u64::from(ticks_per_us) * 1_000_000;
        let levels = self.levels(bytes);
        let edges = levels
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(k, _)| (k as u64 + 1) * tick_hz / u64::from(self.baud))
            .collect();
        Waveform {
            initial: true,
            edges,
        }
    }

    /// What an ideal capture of this signal would record
    pub fn pulse_widths(&self, bytes: &[u8], idle_bit_periods: u32) -> PulseWidths {
        self.capture_of(&self.waveform(bytes, CAPTURE_TPU), idle_bit_periods)
    }

    /// Ideal capture of `bytes` with a short low glitch centered on the
    /// stop bit of each byte index in `frames`
    pub fn glitched_pulse_widths(&self, bytes: &[u8], frames: &[usize], idle_bit_periods: u32) -> PulseWidths {
        let mut wave = self.waveform(bytes, CAPTURE_TPU);
        let quarter_bit = |quarters: u64| quarters * u64::from(CAPTURE_TPU) * 1_000_000 / (4 * u64::from(self.baud));
        for &frame in frames {
            let stop_bit = self.bit_offset(frame) + self.frame_bits() - 1;
            let center = 4 * u64::from(stop_bit) + 2;
            wave.insert_pulse(quarter_bit(center - 1), quarter_bit(center + 1));
        }
        self.capture_of(&wave, idle_bit_periods)
    }

    fn frame_bits(&self) -> u32 {
        let parity = u32::from(self.parity != Parity::None);
        1 + u32::from(self.data_bits) + parity + u32::from(self.stop_bits.count())
    }

    /// Bit period at which byte `index` starts its start bit
    fn bit_offset(&self, index: usize) -> u32 {
        let gaps = if self.gap_every == 0 { 0 } else { index / self.gap_every };
        self.lead_idle_bits + index as u32 * self.frame_bits() + gaps as u32 * self.gap_bits
    }

    fn capture_of(&self, wave: &Waveform, idle_bit_periods: u32) -> PulseWidths {
        let tpu = u64::from(CAPTURE_TPU);
        let bit_ticks = tpu * 1_000_000 / u64::from(self.baud);
        let mut out = PulseWidths::new();
        let _ = out.push(LEVEL_HIGH);
        let mut last = u64::from(idle_bit_periods) * bit_ticks;
        for &edge in wave.edges() {
            if out.push(((edge - last + tpu / 2) / tpu) as u32).is_err() {
                break;
            }
            last = edge;
        }
        out
    }
}

/// Input pin replaying a waveform against a [`SimClock`]
pub struct SimLine<'a> {
    clock: &'a SimClock,
    wave: Waveform,
}

impl<'a> SimLine<'a> {
    pub fn new(clock: &'a SimClock, wave: Waveform) -> Self {
        Self { clock, wave }
    }

    pub fn stuck(clock: &'a SimClock, level: bool) -> Self {
        Self::new(clock, Waveform::constant(level))
    }
}

impl InputPin for SimLine<'_> {
    fn is_high(&self) -> bool {
        self.wave.level_at(self.clock.peek())
    }
}

/// Pin direction as last configured on a [`SimBank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output(bool),
}

/// Bank of waveform-driven pins
pub struct SimBank<'a> {
    clock: &'a SimClock,
    lines: Vec<Waveform>,
    pub modes: Vec<PinMode>,
    /// Every pin ever claimed as output, in order
    pub claimed: Vec<usize>,
}

impl<'a> SimBank<'a> {
    /// `count` pins, all idle high
    pub fn idle(clock: &'a SimClock, count: usize) -> Self {
        let mut lines = Vec::new();
        lines.resize(count, Waveform::constant(true));
        let mut modes = Vec::new();
        modes.resize(count, PinMode::Input);
        Self {
            clock,
            lines,
            modes,
            claimed: Vec::new(),
        }
    }

    pub fn with_line(mut self, index: usize, wave: Waveform) -> Self {
        self.lines[index] = wave;
        self
    }
}

impl PinBank for SimBank<'_> {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn is_high(&self, index: usize) -> bool {
        match self.modes[index] {
            PinMode::Output(level) => level,
            PinMode::Input => self.lines[index].level_at(self.clock.peek()),
        }
    }

    fn set_input(&mut self, index: usize) {
        self.modes[index] = PinMode::Input;
    }

    fn set_output(&mut self, index: usize, high: bool) {
        self.modes[index] = PinMode::Output(high);
        self.claimed.push(index);
    }

    fn set_level(&mut self, index: usize, high: bool) {
        if let PinMode::Output(_) = self.modes[index] {
            self.modes[index] = PinMode::Output(high);
        }
    }
}

/// Serial channel where one TX pin answers every write
///
/// With a `clock`, reads wait on it: the answer becomes readable
/// `answer_delay_us` after the write, and a read that times out consumes
/// its whole timeout.
#[derive(Default)]
pub struct ScriptedSerial<'a> {
    pub baud: u32,
    /// TX pin whose writes produce `answer`
    pub responder: Option<usize>,
    /// Only reads on this pin hear the answer (`None` = any pin)
    pub console_rx: Option<usize>,
    pub answer: Vec<u8>,
    pub answer_delay_us: u64,
    pub clock: Option<&'a SimClock>,
    pub rx_queue: VecDeque<u8>,
    /// Tick from which `rx_queue` is readable
    pub ready_at: u64,
    pub written: Vec<(usize, u8)>,
    pub discards: usize,
}

impl<B: PinBank> SerialChannel<B> for ScriptedSerial<'_> {
    fn set_baud(&mut self, baud: u32) {
        self.baud = baud;
    }

    fn write(&mut self, _bank: &mut B, tx: usize, data: &[u8]) {
        self.written.extend(data.iter().map(|&b| (tx, b)));
        if self.responder == Some(tx) {
            self.rx_queue.extend(self.answer.iter().copied());
            self.ready_at = self
                .clock
                .map_or(0, |clock| clock.peek() + clock.us_to_ticks(self.answer_delay_us));
        }
    }

    fn read_byte(&mut self, _bank: &B, rx: usize, timeout_us: u32) -> Option<u8> {
        let heard = self.console_rx.map_or(true, |pin| pin == rx);
        match self.clock {
            Some(clock) => {
                let now = clock.peek();
                let deadline = now + clock.us_to_ticks(u64::from(timeout_us));
                if !heard || self.rx_queue.is_empty() || self.ready_at > deadline {
                    clock.advance(deadline - now);
                    return None;
                }
                clock.advance(self.ready_at.saturating_sub(now));
            }
            None if !heard => return None,
            None => {}
        }
        self.rx_queue.pop_front()
    }

    fn discard_input(&mut self, _bank: &B, _rx: usize) {
        self.rx_queue.clear();
        self.discards += 1;
    }
}

/// Host link that refuses every write
pub struct BrokenLink {
    pub input: VecDeque<u8>,
}

impl HostLink for BrokenLink {
    type Error = ();

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_all(&mut self, _data: &[u8]) -> Result<(), ()> {
        Err(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Err(())
    }
}

/// Host link fed from a byte script
#[derive(Default)]
pub struct ScriptedLink {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedLink {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            input: bytes.iter().copied().collect(),
            output: Vec::new(),
        }
    }
}

impl HostLink for ScriptedLink {
    type Error = ();

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), ()> {
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingWatchdog {
    pub feeds: usize,
}

impl Watchdog for CountingWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}
