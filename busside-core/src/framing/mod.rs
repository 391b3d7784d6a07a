//! Frame-structure inference
//!
//! Given a capture and a bit time, work out how many bits a UART frame
//! spans, how many of them are stop bits, and whether one is a parity bit.
//!
//! Frames are walked from start bit to start bit: a candidate frame size
//! is plausible when the stop-bit centers of consecutive frames all land on
//! the high level. After each frame the walk resynchronizes on the next
//! falling edge, so idle gaps between frames do not accumulate error.

mod timeline;

use busside_hal::{Parity, StopBits};

use crate::capture::PulseWidths;
use crate::config::{InferenceConfig, StopBitTolerance};
use timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InferenceError {
    /// No candidate frame size fit the capture
    FrameSizeUnresolved,
}

/// A candidate frame layout under test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHypothesis {
    /// Bits from start bit through the last stop bit
    pub total_bits: u8,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

/// Resolved frame layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameShape {
    pub total_bits: u8,
    pub data_bits: u8,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl From<FrameHypothesis> for FrameShape {
    fn from(hypothesis: FrameHypothesis) -> Self {
        let parity_bits = u8::from(hypothesis.parity != Parity::None);
        let overhead = 1 + hypothesis.stop_bits.count() + parity_bits;
        Self {
            total_bits: hypothesis.total_bits,
            data_bits: hypothesis.total_bits.saturating_sub(overhead).min(8),
            stop_bits: hypothesis.stop_bits,
            parity: hypothesis.parity,
        }
    }
}

/// Result of walking a capture with one hypothesis
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WalkScore {
    /// Complete frames walked
    frames: usize,
    /// Frames with a stop bit on the low level
    violations: usize,
    /// Frames whose bits before the stop bits sum even
    even_sums: usize,
    /// Frames whose bits before the stop bits sum odd
    odd_sums: usize,
}

impl WalkScore {
    fn accepted(&self, tolerance: StopBitTolerance, min_frames: usize) -> bool {
        self.frames >= min_frames && tolerance.accepts(self.frames, self.violations)
    }
}

fn walk(timeline: &Timeline, bit_x100: u64, hypothesis: &FrameHypothesis, max_frames: usize) -> WalkScore {
    let total = u64::from(hypothesis.total_bits);
    let stop = u64::from(hypothesis.stop_bits.count());
    let half = bit_x100 / 2;
    let center = |t0: u64, bit: u64| t0 + bit * bit_x100 + half;

    let mut score = WalkScore::default();
    let mut interval = 0;
    if timeline.len() == 0 || total <= stop {
        return score;
    }

    while score.frames < max_frames {
        let t0 = timeline.start(interval);

        let mut stop_ok = true;
        for k in 0..stop {
            match timeline.level_at(center(t0, total - stop + k)) {
                Some(high) => stop_ok &= high,
                None => return score,
            }
        }

        let ones = (1..total - stop)
            .map(|bit| timeline.level_at(center(t0, bit)))
            .try_fold(0usize, |ones, level| level.map(|high| ones + usize::from(high)));
        match ones {
            Some(n) if n % 2 == 0 => score.even_sums += 1,
            Some(_) => score.odd_sums += 1,
            None => {}
        }

        score.frames += 1;
        if !stop_ok {
            score.violations += 1;
        }

        match timeline.next_falling_edge(t0 + total * bit_x100 - half) {
            Some(next) => interval = next,
            None => break,
        }
    }
    score
}

fn classify_parity(score: &WalkScore, config: &InferenceConfig) -> Parity {
    let classified = score.even_sums + score.odd_sums;
    if classified < config.min_parity_frames || classified == 0 {
        return Parity::None;
    }
    let majority = usize::from(config.parity_majority_percent) * classified;
    if score.even_sums * 100 > majority {
        Parity::Even
    } else if score.odd_sums * 100 > majority {
        Parity::Odd
    } else {
        Parity::None
    }
}

/// Infer the frame layout of a capture at `bit_time_x100`
pub fn infer_frame(
    samples: &PulseWidths,
    bit_time_x100: u32,
    config: &InferenceConfig,
) -> Result<FrameShape, InferenceError> {
    if bit_time_x100 == 0 {
        return Err(InferenceError::FrameSizeUnresolved);
    }
    let timeline = Timeline::new(samples);
    let bit = u64::from(bit_time_x100);

    for tolerance in [Some(config.tolerance), config.fallback].into_iter().flatten() {
        for &total_bits in config.frame_bit_candidates.iter().filter(|&&b| b >= 3) {
            let mut hypothesis = FrameHypothesis {
                total_bits,
                stop_bits: StopBits::One,
                parity: Parity::None,
            };
            let score = walk(&timeline, bit, &hypothesis, config.max_frames);
            trace!(
                "frame {}: {} frames, {} violations",
                total_bits,
                score.frames,
                score.violations
            );
            if !score.accepted(tolerance, config.min_frames) {
                continue;
            }

            let two = FrameHypothesis {
                stop_bits: StopBits::Two,
                ..hypothesis
            };
            let two_score = walk(&timeline, bit, &two, config.max_frames);
            let score = if total_bits >= 4 && two_score.accepted(tolerance, config.min_frames) {
                hypothesis = two;
                two_score
            } else {
                score
            };

            hypothesis.parity = classify_parity(&score, config);
            let shape = FrameShape::from(hypothesis);
            debug!(
                "frame: {} bits, {} data, {:?} stop, {:?} parity",
                shape.total_bits,
                shape.data_bits,
                shape.stop_bits,
                shape.parity
            );
            return Ok(shape);
        }
    }
    Err(InferenceError::FrameSizeUnresolved)
}
