//! # System Timer
//!
//! Kernel-facing interface of a tick-generating system timer.
//!
//! ## Philosophy
//!
//! **The kernel counts ticks; the driver only reports them.**
//!
//! A system timer turns a hardware cycle counter into OS ticks and tells
//! the kernel about them through a [`TickAnnouncer`]. It does NOT:
//! - Keep the kernel's notion of uptime (the kernel sums announcements)
//! - Decide when the next deadline is (the kernel asks via `set_timeout`)
//! - Block, sleep or retry
//!
//! ## Modes
//!
//! - **Tickful**: the hardware interrupts once per tick and each interrupt
//!   announces exactly one tick.
//! - **Tickless**: the hardware interrupts when the kernel's next deadline
//!   is due and the interrupt announces however many ticks elapsed.

use crate::interrupts::InterruptHal;

/// Raw kernel encoding of "no timeout"
pub const TICKS_FOREVER: i32 = -1;

/// How far ahead the kernel wants its next wakeup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Wake up after this many ticks
    Ticks(u32),
    /// No deadline; wake up as late as the hardware allows
    Forever,
}

impl Timeout {
    /// Converts the kernel's signed tick argument
    ///
    /// [`TICKS_FOREVER`] maps to [`Timeout::Forever`]. Any other negative
    /// value is a deadline that has already passed and maps to zero ticks.
    pub const fn from_raw(ticks: i32) -> Self {
        if ticks == TICKS_FOREVER {
            Timeout::Forever
        } else if ticks < 0 {
            Timeout::Ticks(0)
        } else {
            Timeout::Ticks(ticks as u32)
        }
    }
}

/// Kernel entry point for tick announcements
///
/// Called from interrupt context. Implementations must not block.
pub trait TickAnnouncer {
    /// Reports `ticks` newly elapsed ticks
    fn announce(&self, ticks: u32);
}

/// System timer driver
///
/// All methods take `&self`: the same driver instance is used from the
/// interrupt handler and from thread context.
///
/// # Concurrency
///
/// `set_timeout` must be called with the timer interrupt masked. The
/// driver does not take a lock of its own.
pub trait SystemTimer {
    /// Programs the hardware and starts generating ticks
    ///
    /// `handler` is the platform's interrupt entry; it must end up calling
    /// [`SystemTimer::on_interrupt`] on this driver.
    fn init<I: InterruptHal>(&self, irq: &mut I, handler: fn());

    /// Services a timer interrupt and announces elapsed ticks
    ///
    /// Runs in interrupt context. Implementations must not block, which
    /// rules out calling a logger that takes a lock.
    fn on_interrupt(&self);

    /// Requests the next wakeup `timeout` ticks from now
    ///
    /// `idle` tells the driver the kernel has nothing else to run.
    /// Drivers without on-demand ticks ignore this call.
    fn set_timeout(&self, timeout: Timeout, idle: bool);

    /// Returns ticks elapsed since the last announcement
    ///
    /// Does not modify any state.
    fn elapsed(&self) -> u32;

    /// Returns the live hardware cycle counter
    fn cycle_count(&self) -> u32;
}
