//! Timer configuration
//!
//! The tick rate, clock rate and scheduling margins are fixed when the
//! system is built. [`ttc_config!`](crate::ttc_config) validates them in a
//! `const` block, so an inconsistent configuration is a compile error:
//!
//! ```rust
//! use hal_xlnx_ttc::config::{TickMode, TimerConfig, TimerParams};
//! use hal_xlnx_ttc::ttc_config;
//!
//! let timer: TimerConfig = ttc_config!(
//!     TimerParams::new(100_000_000, 1_000, TickMode::OnDemand).with_cycles_next_min(5_000)
//! );
//!
//! assert_eq!(timer.cycles_per_tick(), 100_000);
//! ```
//!
//! Configurations assembled at runtime, e.g. deserialized by host
//! tooling, go through [`TimerParams::validate`] instead.

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::CycleConverter;
use crate::regs;

/// Minimum look-ahead, in cycles, between the counter and a new match
///
/// Found by trial and error on the TTC; it is conservative and does not
/// carry over to other timer peripherals.
pub const DEFAULT_CYCLES_NEXT_MIN: u32 = 10_000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Tick rate of zero
    #[error("System tick frequency must not be zero")]
    ZeroTickRate,

    /// Declared cycle rate differs from the device's clock
    #[error(
        "Configured system timer frequency {configured_hz} Hz does not match \
         the TTC clock frequency {device_hz} Hz"
    )]
    ClockMismatch { device_hz: u32, configured_hz: u32 },

    /// Counter clock slower than the tick rate
    #[error(
        "Timer clock frequency {cycles_per_sec} Hz must be greater than the \
         system tick frequency {ticks_per_sec} Hz"
    )]
    ClockSlowerThanTick { cycles_per_sec: u32, ticks_per_sec: u32 },

    /// Tick period is not a whole number of cycles
    #[error(
        "Timer clock frequency {cycles_per_sec} Hz is not divisible by the \
         system tick frequency {ticks_per_sec} Hz"
    )]
    UnevenTickPeriod { cycles_per_sec: u32, ticks_per_sec: u32 },

    /// Minimum match look-ahead of zero
    #[error("Minimum match look-ahead must be at least one cycle")]
    ZeroMinDelta,

    /// Minimum match look-ahead longer than the longest interval
    #[error("Minimum match look-ahead {min} exceeds the maximum interval {max}")]
    MinDeltaExceedsMax { min: u32, max: u32 },
}

/// Tick generation mode, fixed at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum TickMode {
    /// One interrupt per tick ("tickful")
    Periodic,
    /// Interrupt when the kernel's next deadline is due ("tickless")
    OnDemand,
}

/// Device description of one TTC counter channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct TtcDevice {
    /// Base address of the channel's register block
    pub base_address: usize,
    /// Interrupt line of match/overflow events
    pub irq: u32,
    /// Counter input clock
    pub clock_frequency_hz: u32,
}

/// Unvalidated timer parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct TimerParams {
    /// Clock frequency of the counter, as described by the device
    pub device_clock_hz: u32,
    /// Hardware cycles per second the kernel is configured for
    pub hw_cycles_per_sec: u32,
    /// OS ticks per second
    pub ticks_per_sec: u32,
    /// Minimum look-ahead of a new match, in cycles
    pub cycles_next_min: u32,
    /// Longest interval that can be programmed, in cycles
    pub cycles_next_max: u32,
    /// Tick generation mode
    pub mode: TickMode,
}

impl TimerParams {
    /// Creates parameters for a counter clocked at `device_clock_hz`
    ///
    /// The kernel's hardware cycle rate defaults to the device clock and
    /// the margins default to [`DEFAULT_CYCLES_NEXT_MIN`] and
    /// [`regs::MAX_INTERVAL_COUNT`].
    pub const fn new(device_clock_hz: u32, ticks_per_sec: u32, mode: TickMode) -> Self {
        Self {
            device_clock_hz,
            hw_cycles_per_sec: device_clock_hz,
            ticks_per_sec,
            cycles_next_min: DEFAULT_CYCLES_NEXT_MIN,
            cycles_next_max: regs::MAX_INTERVAL_COUNT,
            mode,
        }
    }

    /// Creates parameters for the counter channel `device`
    pub const fn for_device(device: &TtcDevice, ticks_per_sec: u32, mode: TickMode) -> Self {
        Self::new(device.clock_frequency_hz, ticks_per_sec, mode)
    }

    /// Sets the kernel's declared hardware cycle rate
    ///
    /// Must equal the device clock; the setting exists so that a mismatch
    /// between the kernel configuration and the device description is
    /// caught rather than silently overridden.
    pub const fn with_hw_cycles_per_sec(self, hw_cycles_per_sec: u32) -> Self {
        Self {
            hw_cycles_per_sec,
            ..self
        }
    }

    /// Overrides the minimum match look-ahead
    pub const fn with_cycles_next_min(self, cycles_next_min: u32) -> Self {
        Self {
            cycles_next_min,
            ..self
        }
    }

    /// Overrides the longest programmable interval
    pub const fn with_cycles_next_max(self, cycles_next_max: u32) -> Self {
        Self {
            cycles_next_max,
            ..self
        }
    }

    /// Checks the parameters and derives the cycles-per-tick ratio
    pub const fn validate(self) -> Result<TimerConfig, ConfigError> {
        if self.ticks_per_sec == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.device_clock_hz != self.hw_cycles_per_sec {
            return Err(ConfigError::ClockMismatch {
                device_hz: self.device_clock_hz,
                configured_hz: self.hw_cycles_per_sec,
            });
        }
        if self.hw_cycles_per_sec < self.ticks_per_sec {
            return Err(ConfigError::ClockSlowerThanTick {
                cycles_per_sec: self.hw_cycles_per_sec,
                ticks_per_sec: self.ticks_per_sec,
            });
        }
        if self.hw_cycles_per_sec % self.ticks_per_sec != 0 {
            return Err(ConfigError::UnevenTickPeriod {
                cycles_per_sec: self.hw_cycles_per_sec,
                ticks_per_sec: self.ticks_per_sec,
            });
        }
        if self.cycles_next_min == 0 {
            return Err(ConfigError::ZeroMinDelta);
        }
        if self.cycles_next_min > self.cycles_next_max {
            return Err(ConfigError::MinDeltaExceedsMax {
                min: self.cycles_next_min,
                max: self.cycles_next_max,
            });
        }

        Ok(TimerConfig {
            cycles_per_sec: self.hw_cycles_per_sec,
            ticks_per_sec: self.ticks_per_sec,
            cycles_per_tick: self.hw_cycles_per_sec / self.ticks_per_sec,
            cycles_next_min: self.cycles_next_min,
            cycles_next_max: self.cycles_next_max,
            mode: self.mode,
        })
    }

    /// Validates the parameters, panicking on any violation
    ///
    /// Meant for `const` evaluation, where the panic becomes a build
    /// failure; [`ttc_config!`](crate::ttc_config) does that for an
    /// expression. Use [`validate`](Self::validate) for parameters only
    /// known at runtime.
    ///
    /// ```rust,compile_fail
    /// use hal_xlnx_ttc::config::{TickMode, TimerConfig, TimerParams};
    ///
    /// const BAD: TimerConfig = TimerParams::new(1_001, 10, TickMode::Periodic).build();
    /// assert_eq!(BAD.cycles_per_tick(), 100);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics with the violated constraint if [`validate`](Self::validate)
    /// fails.
    pub const fn build(self) -> TimerConfig {
        match self.validate() {
            Ok(config) => config,
            Err(ConfigError::ZeroTickRate) => panic!("System tick frequency must not be zero"),
            Err(ConfigError::ClockMismatch { .. }) => panic!(
                "Configured system timer frequency does not match the TTC clock frequency"
            ),
            Err(ConfigError::ClockSlowerThanTick { .. }) => {
                panic!("Timer clock frequency must be greater than the system tick frequency")
            }
            Err(ConfigError::UnevenTickPeriod { .. }) => {
                panic!("Timer clock frequency is not divisible by the system tick frequency")
            }
            Err(ConfigError::ZeroMinDelta) => {
                panic!("Minimum match look-ahead must be at least one cycle")
            }
            Err(ConfigError::MinDeltaExceedsMax { .. }) => {
                panic!("Minimum match look-ahead exceeds the maximum interval")
            }
        }
    }
}

/// Builds a [`TimerConfig`] from [`TimerParams`] at compile time
///
/// Expands to `TimerParams::build` inside a `const` block, so a violated
/// constraint fails the build wherever the macro is used, including
/// inside function bodies.
///
/// ```rust,compile_fail
/// use hal_xlnx_ttc::config::{TickMode, TimerParams};
/// use hal_xlnx_ttc::ttc_config;
///
/// let config = ttc_config!(
///     TimerParams::new(1_000, 10, TickMode::Periodic).with_hw_cycles_per_sec(2_000)
/// );
/// assert_eq!(config.cycles_per_tick(), 100);
/// ```
#[macro_export]
macro_rules! ttc_config {
    ($params:expr) => {
        const { $crate::config::TimerParams::build($params) }
    };
}

/// Validated, immutable timer configuration
///
/// Only obtainable through [`TimerParams::validate`] or
/// [`TimerParams::build`], so `cycles_per_tick` is always an exact
/// integer of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    cycles_per_sec: u32,
    ticks_per_sec: u32,
    cycles_per_tick: u32,
    cycles_next_min: u32,
    cycles_next_max: u32,
    mode: TickMode,
}

impl TimerConfig {
    /// Hardware cycles per second
    pub const fn cycles_per_sec(&self) -> u32 {
        self.cycles_per_sec
    }

    /// OS ticks per second
    pub const fn ticks_per_sec(&self) -> u32 {
        self.ticks_per_sec
    }

    /// Hardware cycles per OS tick
    pub const fn cycles_per_tick(&self) -> u32 {
        self.cycles_per_tick
    }

    /// Minimum look-ahead of a new match, in cycles
    pub const fn cycles_next_min(&self) -> u32 {
        self.cycles_next_min
    }

    /// Longest programmable interval, in cycles
    pub const fn cycles_next_max(&self) -> u32 {
        self.cycles_next_max
    }

    /// Tick generation mode
    pub const fn mode(&self) -> TickMode {
        self.mode
    }

    /// Converter for this configuration's tick period
    pub const fn converter(&self) -> CycleConverter {
        CycleConverter::new(self.cycles_per_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIODIC: TimerConfig =
        crate::ttc_config!(TimerParams::new(100_000_000, 1_000, TickMode::Periodic));

    #[test]
    fn test_const_build() {
        assert_eq!(PERIODIC.cycles_per_tick(), 100_000);
        assert_eq!(PERIODIC.cycles_per_sec(), 100_000_000);
        assert_eq!(PERIODIC.ticks_per_sec(), 1_000);
        assert_eq!(PERIODIC.cycles_next_min(), DEFAULT_CYCLES_NEXT_MIN);
        assert_eq!(PERIODIC.cycles_next_max(), regs::MAX_INTERVAL_COUNT);
        assert_eq!(PERIODIC.mode(), TickMode::Periodic);
    }

    #[test]
    fn test_equal_rates_give_one_cycle_per_tick() {
        let config = TimerParams::new(1_000, 1_000, TickMode::OnDemand)
            .with_cycles_next_min(1)
            .validate()
            .unwrap();
        assert_eq!(config.cycles_per_tick(), 1);
    }

    #[test]
    fn test_overrides() {
        let config = TimerParams::new(1_000_000, 100, TickMode::OnDemand)
            .with_cycles_next_min(10)
            .with_cycles_next_max(0xFFFF)
            .validate()
            .unwrap();
        assert_eq!(config.cycles_per_tick(), 10_000);
        assert_eq!(config.cycles_next_min(), 10);
        assert_eq!(config.cycles_next_max(), 0xFFFF);
    }

    #[test]
    fn test_for_device() {
        let device = TtcDevice {
            base_address: 0xFF11_0000,
            irq: 68,
            clock_frequency_hz: 99_990_000,
        };
        let config = TimerParams::for_device(&device, 100, TickMode::Periodic)
            .validate()
            .unwrap();
        assert_eq!(config.cycles_per_tick(), 999_900);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let err = TimerParams::new(1_000, 0, TickMode::Periodic).validate();
        assert_eq!(err, Err(ConfigError::ZeroTickRate));
    }

    #[test]
    fn test_clock_mismatch_rejected() {
        let err = TimerParams::new(100_000_000, 1_000, TickMode::Periodic)
            .with_hw_cycles_per_sec(50_000_000)
            .validate();
        assert_eq!(
            err,
            Err(ConfigError::ClockMismatch {
                device_hz: 100_000_000,
                configured_hz: 50_000_000,
            })
        );
    }

    #[test]
    fn test_slow_clock_rejected() {
        let err = TimerParams::new(500, 1_000, TickMode::Periodic).validate();
        assert_eq!(
            err,
            Err(ConfigError::ClockSlowerThanTick {
                cycles_per_sec: 500,
                ticks_per_sec: 1_000,
            })
        );
    }

    #[test]
    fn test_uneven_period_rejected() {
        let err = TimerParams::new(100_000_001, 1_000, TickMode::OnDemand).validate();
        assert_eq!(
            err,
            Err(ConfigError::UnevenTickPeriod {
                cycles_per_sec: 100_000_001,
                ticks_per_sec: 1_000,
            })
        );
    }

    #[test]
    fn test_zero_margin_rejected() {
        let err = TimerParams::new(1_000_000, 100, TickMode::OnDemand)
            .with_cycles_next_min(0)
            .validate();
        assert_eq!(err, Err(ConfigError::ZeroMinDelta));
    }

    #[test]
    fn test_margin_above_max_rejected() {
        let err = TimerParams::new(1_000_000, 100, TickMode::OnDemand)
            .with_cycles_next_max(5_000)
            .validate();
        assert_eq!(
            err,
            Err(ConfigError::MinDeltaExceedsMax {
                min: DEFAULT_CYCLES_NEXT_MIN,
                max: 5_000,
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::UnevenTickPeriod {
            cycles_per_sec: 7,
            ticks_per_sec: 2,
        };
        assert_eq!(
            err.to_string(),
            "Timer clock frequency 7 Hz is not divisible by the system tick frequency 2 Hz"
        );
        assert_eq!(
            ConfigError::ZeroMinDelta.to_string(),
            "Minimum match look-ahead must be at least one cycle"
        );
    }

    #[test]
    fn test_macro_in_function_body() {
        let config = crate::ttc_config!(TimerParams::new(10_000, 100, TickMode::OnDemand)
            .with_cycles_next_min(10)
            .with_cycles_next_max(0xFFFF));

        assert_eq!(config.cycles_per_tick(), 100);
        assert_eq!(config.cycles_next_max(), 0xFFFF);
        assert_eq!(
            Ok(config),
            TimerParams::new(10_000, 100, TickMode::OnDemand)
                .with_cycles_next_min(10)
                .with_cycles_next_max(0xFFFF)
                .validate()
        );
    }

    #[cfg(feature = "serde_support")]
    #[test]
    fn test_params_deserialize_and_validate() {
        let json = r#"{
            "device_clock_hz": 1000000,
            "hw_cycles_per_sec": 1000000,
            "ticks_per_sec": 100,
            "cycles_next_min": 10,
            "cycles_next_max": 4294967295,
            "mode": "OnDemand"
        }"#;
        let params: TimerParams = serde_json::from_str(json).unwrap();
        let config = params.validate().unwrap();
        assert_eq!(config.cycles_per_tick(), 10_000);
        assert_eq!(config.mode(), TickMode::OnDemand);
    }
}
