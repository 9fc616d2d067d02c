//! Cycle/tick conversion

/// Converts between hardware cycles and OS ticks
///
/// Conversion is floor division; leftover cycles are never carried.
/// Callers measure every delta from a recorded counter value rather
/// than from an ideal tick grid, so nothing accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConverter {
    cycles_per_tick: u32,
}

impl CycleConverter {
    /// `cycles_per_tick` must be non-zero; [`TimerConfig`] guarantees it.
    ///
    /// [`TimerConfig`]: crate::config::TimerConfig
    pub(crate) const fn new(cycles_per_tick: u32) -> Self {
        Self { cycles_per_tick }
    }

    /// Hardware cycles per OS tick
    pub const fn cycles_per_tick(&self) -> u32 {
        self.cycles_per_tick
    }

    /// Whole ticks contained in `cycles`
    ///
    /// Pass a wrapping counter difference (`now.wrapping_sub(then)`) and
    /// the result is the same whether or not the counter wrapped.
    pub const fn cycles_to_ticks(&self, cycles: u32) -> u32 {
        cycles / self.cycles_per_tick
    }

    /// Cycles spanned by `ticks`, saturating at `u32::MAX`
    pub const fn ticks_to_cycles(&self, ticks: u32) -> u32 {
        ticks.saturating_mul(self.cycles_per_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_to_cycles() {
        let conv = CycleConverter::new(100);
        assert_eq!(conv.ticks_to_cycles(0), 0);
        assert_eq!(conv.ticks_to_cycles(1), 100);
        assert_eq!(conv.ticks_to_cycles(42), 4_200);
    }

    #[test]
    fn test_ticks_to_cycles_saturates() {
        let conv = CycleConverter::new(100_000);
        assert_eq!(conv.ticks_to_cycles(1_000_000), u32::MAX);
    }

    #[test]
    fn test_cycles_to_ticks_floors() {
        let conv = CycleConverter::new(100);
        assert_eq!(conv.cycles_to_ticks(0), 0);
        assert_eq!(conv.cycles_to_ticks(99), 0);
        assert_eq!(conv.cycles_to_ticks(100), 1);
        assert_eq!(conv.cycles_to_ticks(250), 2);
    }

    #[test]
    fn test_wraparound_transparency() {
        let conv = CycleConverter::new(100);
        let pairs = [
            (1_000u32, 650u32),
            (50, 50u32.wrapping_sub(350)),
            (u32::MAX, u32::MAX - 350),
            (120, u32::MAX - 229),
        ];
        for (now, then) in pairs {
            assert_eq!(conv.cycles_to_ticks(now.wrapping_sub(then)), 3, "now={now} then={then}");
        }
    }

    #[test]
    fn test_unit_ratio_is_identity() {
        let conv = CycleConverter::new(1);
        assert_eq!(conv.cycles_to_ticks(12_345), 12_345);
        assert_eq!(conv.ticks_to_cycles(12_345), 12_345);
        assert_eq!(conv.cycles_per_tick(), 1);
    }
}
