//! # Xilinx PS TTC System Timer
//!
//! This crate implements the HAL [`SystemTimer`](hal::SystemTimer) on one
//! counter channel of the Xilinx PS Triple Timer Counter.
//!
//! ## Scope
//!
//! Single-channel tick generation only: the free-running 32-bit counter
//! and `MATCH_0` drive either a fixed-period tick or on-demand wakeups.
//! Device addresses, interrupt routing and the kernel's tick accounting
//! are supplied by the platform through `hal` traits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hal::SystemTimer;
//! use hal_xlnx_ttc::{ttc_config, RealMmio, TickMode, TimerConfig, TimerParams, TtcDevice, TtcTimer};
//!
//! const DEVICE: TtcDevice = TtcDevice {
//!     base_address: 0xFF11_0000,
//!     irq: 68,
//!     clock_frequency_hz: 100_000_000,
//! };
//! const CONFIG: TimerConfig =
//!     ttc_config!(TimerParams::for_device(&DEVICE, 1_000, TickMode::OnDemand));
//!
//! // SAFETY: TTC0 is mapped at DEVICE.base_address and owned by this driver.
//! static TIMER: TtcTimer<RealMmio, KernelClock> =
//!     TtcTimer::new(unsafe { RealMmio::new(DEVICE.base_address) }, KernelClock, DEVICE, CONFIG);
//!
//! fn ttc_isr() {
//!     TIMER.on_interrupt();
//! }
//!
//! TIMER.init(&mut gic, ttc_isr);
//! ```

pub mod config;
pub mod convert;
pub mod driver;
pub mod mmio;
pub mod regs;
pub mod schedule;
pub mod test_utils;

pub use config::{ConfigError, TickMode, TimerConfig, TimerParams, TtcDevice};
pub use convert::CycleConverter;
pub use driver::{DriverState, TtcTimer};
pub use mmio::{FakeTtc, RealMmio};
pub use schedule::MatchScheduler;
