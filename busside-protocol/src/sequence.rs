//! Request ordering
//!
//! The host numbers every request. A request is only acted upon if its
//! sequence number is newer than the last one accepted, which drops
//! retransmitted duplicates and stale frames without any reply.

/// Sequence number that disables the ordering check
pub const SEQUENCE_UNCHECKED: u32 = 0;

/// Tracks the last accepted sequence number
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    last_accepted: u32,
}

impl SequenceGate {
    /// Create a gate that has accepted nothing yet
    pub const fn new() -> Self {
        Self { last_accepted: 0 }
    }

    /// Decide whether a request with `sequence` may be dispatched
    ///
    /// Accepting a checked sequence number records it as the new floor.
    pub fn accept(&mut self, sequence: u32) -> bool {
        if sequence == SEQUENCE_UNCHECKED {
            return true;
        }
        if sequence <= self.last_accepted {
            return false;
        }
        self.last_accepted = sequence;
        true
    }

    /// Last accepted sequence number (0 if none)
    pub fn last_accepted(&self) -> u32 {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    #[test]
    fn test_duplicates_and_stale_dropped() {
        let mut gate = SequenceGate::new();
        let accepted: Vec<u32> = [5, 5, 6, 4, 7]
            .into_iter()
            .filter(|&seq| gate.accept(seq))
            .collect();
        assert_eq!(accepted, [5, 6, 7]);
        assert_eq!(gate.last_accepted(), 7);
    }

    #[test]
    fn test_unchecked_always_accepted() {
        let mut gate = SequenceGate::new();
        assert!(gate.accept(10));
        assert!(gate.accept(SEQUENCE_UNCHECKED));
        assert!(gate.accept(SEQUENCE_UNCHECKED));
        // The unchecked frames did not move the floor
        assert!(!gate.accept(10));
        assert!(gate.accept(11));
    }

    proptest! {
        #[test]
        fn prop_accepted_strictly_increasing(seqs in proptest::collection::vec(1u32..64, 0..64)) {
            let mut gate = SequenceGate::new();
            let accepted: Vec<u32> = seqs.iter().copied().filter(|&s| gate.accept(s)).collect();
            prop_assert!(accepted.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
