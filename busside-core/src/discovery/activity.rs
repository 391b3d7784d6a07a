//! Line-activity histogram
//!
//! Counts level changes on candidate pins to tell live UART lines from
//! quiet or floating ones before any timing analysis is attempted.

use busside_hal::{MonotonicClock, PinBank, Watchdog};

/// Most pins a bank may expose to discovery
pub const MAX_PINS: usize = 16;

/// Toggle counter for one pin
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineState {
    pub toggles: u32,
    last_high: bool,
}

impl LineState {
    fn start(high: bool) -> Self {
        Self {
            toggles: 0,
            last_high: high,
        }
    }

    /// Record a sample, returning whether the level changed
    fn observe(&mut self, high: bool) -> bool {
        let changed = high != self.last_high;
        if changed {
            self.toggles = self.toggles.saturating_add(1);
            self.last_high = high;
        }
        changed
    }
}

/// Toggle counters for a set of bank pins
#[derive(Debug, Default)]
pub struct ActivityMonitor {
    lines: heapless::Vec<(usize, LineState), MAX_PINS>,
}

impl ActivityMonitor {
    /// Monitor every pin of `bank` (up to [`MAX_PINS`])
    pub fn all<B: PinBank>(bank: &B) -> Self {
        let lines = (0..bank.len().min(MAX_PINS))
            .map(|index| (index, LineState::default()))
            .collect();
        Self { lines }
    }

    /// Monitor a single pin
    pub fn single(index: usize) -> Self {
        let mut lines = heapless::Vec::new();
        let _ = lines.push((index, LineState::default()));
        Self { lines }
    }

    /// Release the monitored pins to inputs and poll them for `window_us`
    pub fn run<B, C, W>(&mut self, bank: &mut B, clock: &C, watchdog: &mut W, window_us: u64, feed_interval_us: u64)
    where
        B: PinBank,
        C: MonotonicClock,
        W: Watchdog,
    {
        self.lines.retain(|(index, _)| bank.contains(*index));
        for (index, _) in self.lines.iter() {
            bank.set_input(*index);
        }
        for (index, state) in self.lines.iter_mut() {
            *state = LineState::start(bank.is_high(*index));
        }

        let window = clock.us_to_ticks(window_us);
        let feed_every = clock.us_to_ticks(feed_interval_us);
        let start = clock.now_ticks();
        let mut last_feed = start;
        watchdog.feed();

        loop {
            let now = clock.now_ticks();
            if now.saturating_sub(start) >= window {
                break;
            }
            let mut toggled = false;
            for (index, state) in self.lines.iter_mut() {
                toggled |= state.observe(bank.is_high(*index));
            }
            if toggled || now.saturating_sub(last_feed) >= feed_every {
                watchdog.feed();
                last_feed = now;
            }
        }
        debug!("activity: {} pins sampled for {} us", self.lines.len(), window_us);
    }

    /// Toggles seen on bank pin `index`
    pub fn toggles(&self, index: usize) -> u32 {
        self.lines
            .iter()
            .find(|(i, _)| *i == index)
            .map_or(0, |(_, state)| state.toggles)
    }

    /// `(pin, toggles)` for every monitored pin
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.lines.iter().map(|(index, state)| (*index, state.toggles))
    }
}
