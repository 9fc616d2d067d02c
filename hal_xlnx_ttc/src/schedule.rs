//! Match register scheduling

use hal::MmioBus;

use crate::regs;

/// Computes and programs `MATCH_0`
///
/// The TTC only raises a match interrupt when the counter reaches the
/// match value. A value too close to (or behind) the counter at the time
/// it is written would be missed and the timer would sleep for a full
/// counter wrap. The scheduler therefore pushes every match at least
/// `min_delta` cycles past the counter it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScheduler {
    min_delta: u32,
}

impl MatchScheduler {
    /// Creates a scheduler with a look-ahead of `min_delta` cycles
    pub const fn new(min_delta: u32) -> Self {
        Self { min_delta }
    }

    /// Minimum look-ahead in cycles
    pub const fn min_delta(&self) -> u32 {
        self.min_delta
    }

    /// Returns the match value for `target` given the counter `cycles`
    ///
    /// If `target` is fewer than `min_delta` cycles ahead of `cycles`
    /// (modulo 2^32) it is moved forward to exactly `min_delta` ahead.
    pub const fn compute_match(&self, cycles: u32, target: u32) -> u32 {
        let delta = target.wrapping_sub(cycles);
        if delta < self.min_delta {
            target.wrapping_add(self.min_delta - delta)
        } else {
            target
        }
    }

    /// Programs `MATCH_0` for `target` and returns the written value
    pub fn update_match<B: MmioBus>(&self, bus: &B, cycles: u32, target: u32) -> u32 {
        let value = self.compute_match(cycles, target);
        bus.write32(regs::MATCH_0, value);
        value
    }
}
