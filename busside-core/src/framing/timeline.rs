//! Absolute time view of a capture
//!
//! Converts interval widths into start times so the level at any instant
//! can be looked up. Times are kept in 0.01 µs to match bit times.

use crate::capture::PulseWidths;
use crate::config::MAX_PULSES;

/// Interval start times of the bit intervals of a capture
///
/// Interval `j` corresponds to capture index `j + 2`; even intervals are
/// low, odd intervals are high, and interval 0 begins with a start bit.
pub(crate) struct Timeline {
    /// Start of each interval, followed by the end of the last one
    starts: heapless::Vec<u64, { MAX_PULSES + 1 }>,
}

impl Timeline {
    pub(crate) fn new(samples: &PulseWidths) -> Self {
        let mut starts = heapless::Vec::new();
        let mut t = 0u64;
        let _ = starts.push(t);
        for &width in samples.iter().skip(2) {
            t += u64::from(width) * 100;
            if starts.push(t).is_err() {
                break;
            }
        }
        Self { starts }
    }

    /// Number of intervals
    pub(crate) fn len(&self) -> usize {
        self.starts.len() - 1
    }

    /// Start time of interval `j`
    pub(crate) fn start(&self, j: usize) -> u64 {
        self.starts[j]
    }

    /// Line level at `t`, `None` past the end of the capture
    pub(crate) fn level_at(&self, t: u64) -> Option<bool> {
        let after = self.starts.partition_point(|&s| s <= t);
        if after > self.len() {
            return None;
        }
        Some((after - 1) % 2 == 1)
    }

    /// First low interval starting at or after `t`
    pub(crate) fn next_falling_edge(&self, t: u64) -> Option<usize> {
        let first = self.starts.partition_point(|&s| s < t);
        let even = first + first % 2;
        (even < self.len()).then_some(even)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(widths: &[u32]) -> Timeline {
        let mut samples = PulseWidths::new();
        samples.extend_from_slice(&[1, 999]).unwrap();
        samples.extend_from_slice(widths).unwrap();
        Timeline::new(&samples)
    }

    #[test]
    fn test_levels() {
        let tl = timeline(&[10, 20, 30]);
        assert_eq!(tl.len(), 3);
        assert_eq!(tl.level_at(0), Some(false));
        assert_eq!(tl.level_at(999), Some(false));
        assert_eq!(tl.level_at(1000), Some(true));
        assert_eq!(tl.level_at(2999), Some(true));
        assert_eq!(tl.level_at(3000), Some(false));
        assert_eq!(tl.level_at(5999), Some(false));
        assert_eq!(tl.level_at(6000), None);
    }

    #[test]
    fn test_next_falling_edge() {
        let tl = timeline(&[10, 20, 30, 40, 50]);
        assert_eq!(tl.next_falling_edge(0), Some(0));
        assert_eq!(tl.next_falling_edge(1), Some(2));
        assert_eq!(tl.next_falling_edge(3000), Some(2));
        assert_eq!(tl.next_falling_edge(3001), Some(4));
        assert_eq!(tl.start(4), 10000);
        assert_eq!(tl.next_falling_edge(10001), None);
    }

    #[test]
    fn test_empty() {
        let mut samples = PulseWidths::new();
        samples.push(1).unwrap();
        let tl = Timeline::new(&samples);
        assert_eq!(tl.len(), 0);
        assert_eq!(tl.level_at(0), None);
        assert_eq!(tl.next_falling_edge(0), None);
    }
}
