//! Register access for the TTC
//!
//! This module provides the two [`MmioBus`] implementations the driver is
//! used with: volatile access to a real register block, and a behavioural
//! model of the TTC for tests.
//!
//! ## Safety
//!
//! MMIO is inherently unsafe. `RealMmio` isolates all unsafe code to its
//! constructor contract and two small accessor functions.

use std::sync::{Mutex, MutexGuard};

use hal::MmioBus;

use crate::regs;

/// Volatile access to a memory-mapped TTC register block
///
/// ## Example
///
/// ```rust,ignore
/// // SAFETY: 0xFF11_0000 is TTC0 on this SoC and nothing else maps it.
/// let bus = unsafe { RealMmio::new(0xFF11_0000) };
/// let count = bus.read32(regs::COUNT_VALUE);
/// ```
#[derive(Debug)]
pub struct RealMmio {
    base: usize,
}

impl RealMmio {
    /// Creates a bus for the register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of a TTC counter channel, mapped as
    /// device memory for the lifetime of the returned value, and no other
    /// code may access that register block concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Returns the base address of the register block
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl MmioBus for RealMmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: the constructor contract guarantees `base` maps the TTC
        // register block; offsets come from `regs` and stay inside it.
        unsafe { ((self.base + offset) as *const u32).read_volatile() }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: see `read32`.
        unsafe { ((self.base + offset) as *mut u32).write_volatile(value) }
    }
}

const REGISTER_WORDS: usize = regs::REGISTER_SPAN / 4;

#[derive(Debug)]
struct TtcModel {
    regs: [u32; REGISTER_WORDS],
    counter: u32,
    status: u32,
    writes: Vec<(usize, u32)>,
}

impl TtcModel {
    const fn new() -> Self {
        Self {
            regs: [0; REGISTER_WORDS],
            counter: 0,
            status: 0,
            writes: Vec::new(),
        }
    }

    fn reg(&self, offset: usize) -> u32 {
        self.regs[offset / 4]
    }

    fn running(&self) -> bool {
        self.reg(regs::CNT_CNTRL) & regs::CNT_CNTRL_DIS == 0
    }
}

/// Fake TTC register block for testing
///
/// Models the parts of the TTC the system timer depends on:
/// - `COUNT_VALUE` is an up-counter that only moves when [`advance`] is
///   called and the counter is enabled
/// - setting `CNT_CNTRL.RST` zeroes the counter and the bit self-clears
/// - crossing `MATCH_0` in match mode latches `IXR_MATCH_0` in `ISR`
/// - wrapping past `u32::MAX` latches `IXR_CNT_OVR`
/// - reading `ISR` returns and clears the latched status; writing it
///   clears the written bits
///
/// Every write is captured for test verification.
///
/// ## Example
///
/// ```rust
/// use hal::MmioBus;
/// use hal_xlnx_ttc::mmio::FakeTtc;
/// use hal_xlnx_ttc::regs;
///
/// let ttc = FakeTtc::new();
/// ttc.write32(regs::MATCH_0, 100);
/// ttc.write32(regs::CNT_CNTRL, regs::CNT_CNTRL_MATCH);
/// ttc.write32(regs::IER, regs::IXR_MATCH_0);
///
/// ttc.advance(99);
/// assert!(!ttc.interrupt_pending());
/// ttc.advance(1);
/// assert!(ttc.interrupt_pending());
///
/// assert_eq!(ttc.read32(regs::ISR), regs::IXR_MATCH_0);
/// assert!(!ttc.interrupt_pending());
/// ```
///
/// [`advance`]: FakeTtc::advance
#[derive(Debug)]
pub struct FakeTtc {
    model: Mutex<TtcModel>,
}

impl FakeTtc {
    /// Creates a fake TTC with all registers and the counter at zero
    pub const fn new() -> Self {
        Self {
            model: Mutex::new(TtcModel::new()),
        }
    }

    fn model(&self) -> MutexGuard<'_, TtcModel> {
        self.model.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lets `cycles` counter cycles elapse
    ///
    /// Does nothing while the counter is disabled.
    pub fn advance(&self, cycles: u32) {
        let mut model = self.model();
        if !model.running() {
            return;
        }

        let old = model.counter;
        let (new, wrapped) = old.overflowing_add(cycles);
        model.counter = new;

        let distance = model.reg(regs::MATCH_0).wrapping_sub(old);
        let match_mode = model.reg(regs::CNT_CNTRL) & regs::CNT_CNTRL_MATCH != 0;
        if match_mode && distance != 0 && distance <= cycles {
            model.status |= regs::IXR_MATCH_0;
        }
        if wrapped {
            model.status |= regs::IXR_CNT_OVR;
        }
    }

    /// Moves the counter to `value` without latching any status
    ///
    /// Lets tests start from an arbitrary counter position, e.g. just
    /// below the wrap point.
    pub fn set_counter(&self, value: u32) {
        self.model().counter = value;
    }

    /// Returns the counter without going through the bus
    pub fn counter(&self) -> u32 {
        self.model().counter
    }

    /// Returns the programmed `MATCH_0` value
    pub fn match_value(&self) -> u32 {
        self.model().reg(regs::MATCH_0)
    }

    /// Returns the modular distance from the counter to `MATCH_0`
    pub fn cycles_until_match(&self) -> u32 {
        let model = self.model();
        model.reg(regs::MATCH_0).wrapping_sub(model.counter)
    }

    /// Returns a register value without read side effects
    pub fn peek(&self, offset: usize) -> u32 {
        let model = self.model();
        match offset {
            regs::COUNT_VALUE => model.counter,
            regs::ISR => model.status,
            _ => model.reg(offset),
        }
    }

    /// Returns true if an enabled interrupt source is latched
    pub fn interrupt_pending(&self) -> bool {
        let model = self.model();
        model.status & model.reg(regs::IER) != 0
    }

    /// Returns all captured write operations: (offset, value)
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.model().writes.clone()
    }

    /// Clears all captured writes
    pub fn clear_writes(&self) {
        self.model().writes.clear();
    }
}

impl Default for FakeTtc {
    fn default() -> Self {
        Self::new()
    }
}

impl MmioBus for FakeTtc {
    fn read32(&self, offset: usize) -> u32 {
        assert!(
            offset < regs::REGISTER_SPAN && offset % 4 == 0,
            "FakeTtc: read outside register block at offset 0x{:02X}",
            offset
        );

        let mut model = self.model();
        match offset {
            regs::COUNT_VALUE => model.counter,
            regs::ISR => core::mem::take(&mut model.status),
            _ => model.reg(offset),
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(
            offset < regs::REGISTER_SPAN && offset % 4 == 0,
            "FakeTtc: write outside register block at offset 0x{:02X}",
            offset
        );

        let mut model = self.model();
        model.writes.push((offset, value));
        match offset {
            regs::COUNT_VALUE => {}
            regs::ISR => model.status &= !value,
            regs::CNT_CNTRL => {
                if value & regs::CNT_CNTRL_RST != 0 {
                    model.counter = 0;
                }
                model.regs[offset / 4] = value & !regs::CNT_CNTRL_RST;
            }
            _ => model.regs[offset / 4] = value,
        }
    }
}
