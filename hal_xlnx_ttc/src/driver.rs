//! # TTC System Timer Driver
//!
//! Generates OS ticks from one TTC counter channel.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --init--> Stopped --(registers programmed)--> Running
//! ```
//!
//! `init` passes through `Stopped` while the counter is halted and the
//! registers are reset; every other operation expects `Running`.
//!
//! ## Modes
//!
//! - **Periodic**: `MATCH_0` is re-armed one tick ahead on every interrupt
//!   and each interrupt announces exactly one tick.
//! - **OnDemand**: the kernel arms `MATCH_0` through `set_timeout`; each
//!   interrupt announces the whole ticks elapsed since the previous one.
//!
//! ## Concurrency
//!
//! The interrupt handler and thread context share the driver through
//! `&self`. `set_timeout` must run with the timer interrupt masked; under
//! that discipline the watermark has a single writer at a time and
//! relaxed atomics are sufficient.
//!
//! Only `init` logs. `on_interrupt` and `set_timeout` never call into the
//! logger, which may take a lock held by the interrupted context.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use hal::{InterruptHal, MmioBus, SystemTimer, TickAnnouncer, Timeout};
use log::{info, warn};

use crate::config::{TickMode, TimerConfig, TtcDevice};
use crate::convert::CycleConverter;
use crate::regs;
use crate::schedule::MatchScheduler;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DriverState {
    /// `init` has not run
    Uninitialized = 0,
    /// Counter halted while `init` programs the registers
    Stopped = 1,
    /// Counter running, interrupts enabled
    Running = 2,
}

impl DriverState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => DriverState::Stopped,
            2 => DriverState::Running,
            _ => DriverState::Uninitialized,
        }
    }
}

#[derive(Debug)]
enum ModeState {
    Periodic,
    OnDemand {
        /// Counter value at the last announcement
        last_cycles: AtomicU32,
    },
}

/// TTC-backed system timer
///
/// Generic over the register bus (`RealMmio` on hardware, `FakeTtc` in
/// tests) and the kernel's tick announcer. `new` is `const`, so the
/// driver can live in a `static` shared with the interrupt handler.
#[derive(Debug)]
pub struct TtcTimer<B, A> {
    bus: B,
    announcer: A,
    device: TtcDevice,
    config: TimerConfig,
    converter: CycleConverter,
    scheduler: MatchScheduler,
    mode: ModeState,
    state: AtomicU8,
}

impl<B, A> TtcTimer<B, A> {
    /// Creates an uninitialized driver
    pub const fn new(bus: B, announcer: A, device: TtcDevice, config: TimerConfig) -> Self {
        let mode = match config.mode() {
            TickMode::Periodic => ModeState::Periodic,
            TickMode::OnDemand => ModeState::OnDemand {
                last_cycles: AtomicU32::new(0),
            },
        };

        Self {
            bus,
            announcer,
            device,
            config,
            converter: config.converter(),
            scheduler: MatchScheduler::new(config.cycles_next_min()),
            mode,
            state: AtomicU8::new(DriverState::Uninitialized as u8),
        }
    }

    /// Returns the register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Returns the tick announcer
    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    /// Returns the device description
    pub fn device(&self) -> &TtcDevice {
        &self.device
    }

    /// Returns the timer configuration
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> DriverState {
        DriverState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Returns the counter value at the last announcement
    ///
    /// `None` in periodic mode, which keeps no watermark.
    pub fn last_announced(&self) -> Option<u32> {
        match &self.mode {
            ModeState::Periodic => None,
            ModeState::OnDemand { last_cycles } => Some(last_cycles.load(Ordering::Relaxed)),
        }
    }

    fn set_state(&self, state: DriverState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl<B: MmioBus, A: TickAnnouncer> TtcTimer<B, A> {
    fn read_count(&self) -> u32 {
        self.bus.read32(regs::COUNT_VALUE)
    }
}

impl<B: MmioBus, A: TickAnnouncer> SystemTimer for TtcTimer<B, A> {
    fn init<I: InterruptHal>(&self, irq: &mut I, handler: fn()) {
        if self.state() != DriverState::Uninitialized {
            warn!(
                "ttc@{:#x}: re-initializing running timer",
                self.device.base_address
            );
        }

        let bus = &self.bus;

        bus.write32(regs::CNT_CNTRL, regs::CNT_CNTRL_DIS);
        self.set_state(DriverState::Stopped);

        if let ModeState::OnDemand { last_cycles } = &self.mode {
            last_cycles.store(0, Ordering::Relaxed);
        }

        bus.write32(regs::CNT_CNTRL, regs::CNT_CNTRL_RESET_VALUE);
        bus.write32(regs::CLK_CNTRL, 0);
        bus.write32(regs::INTERVAL_VAL, 0);
        bus.write32(regs::MATCH_0, 0);
        bus.write32(regs::MATCH_1, 0);
        bus.write32(regs::MATCH_2, 0);
        bus.write32(regs::IER, 0);
        bus.write32(regs::ISR, regs::IXR_ALL);

        bus.set_bits(regs::CNT_CNTRL, regs::CNT_CNTRL_RST);
        bus.set_bits(regs::CNT_CNTRL, regs::CNT_CNTRL_MATCH);

        // Tickless starts as late as possible until the kernel asks.
        let initial_match = match self.mode {
            ModeState::Periodic => self.converter.cycles_per_tick(),
            ModeState::OnDemand { .. } => self.config.cycles_next_max(),
        };
        bus.write32(regs::MATCH_0, initial_match);

        irq.connect(self.device.irq, handler);
        irq.enable_irq(self.device.irq);

        bus.set_bits(regs::IER, regs::IXR_MATCH_0);
        bus.clear_bits(regs::CNT_CNTRL, regs::CNT_CNTRL_DIS);
        self.set_state(DriverState::Running);

        info!(
            "ttc@{:#x}: {:?} mode, {} cycles/tick, irq {}, first match {:#x}",
            self.device.base_address,
            self.config.mode(),
            self.converter.cycles_per_tick(),
            self.device.irq,
            initial_match
        );
    }

    fn on_interrupt(&self) {
        // Reading ISR acknowledges the interrupt.
        self.bus.read32(regs::ISR);

        if self.state() != DriverState::Running {
            return;
        }

        let cycles = self.read_count();
        let ticks = match &self.mode {
            ModeState::Periodic => {
                let target = cycles.wrapping_add(self.converter.cycles_per_tick());
                self.scheduler.update_match(&self.bus, cycles, target);
                1
            }
            ModeState::OnDemand { last_cycles } => {
                let last = last_cycles.load(Ordering::Relaxed);
                last_cycles.store(cycles, Ordering::Relaxed);
                self.converter.cycles_to_ticks(cycles.wrapping_sub(last))
            }
        };

        self.announcer.announce(ticks);
    }

    fn set_timeout(&self, timeout: Timeout, _idle: bool) {
        if matches!(self.mode, ModeState::Periodic) || self.state() != DriverState::Running {
            return;
        }

        let cycles = self.read_count();
        let max = self.config.cycles_next_max();
        let interval = match timeout {
            Timeout::Forever => max,
            Timeout::Ticks(ticks) => self.converter.ticks_to_cycles(ticks).min(max),
        };

        self.scheduler
            .update_match(&self.bus, cycles, cycles.wrapping_add(interval));
    }

    fn elapsed(&self) -> u32 {
        match &self.mode {
            ModeState::Periodic => 0,
            ModeState::OnDemand { last_cycles } => {
                let last = last_cycles.load(Ordering::Relaxed);
                self.converter
                    .cycles_to_ticks(self.read_count().wrapping_sub(last))
            }
        }
    }

    fn cycle_count(&self) -> u32 {
        self.read_count()
    }
}
