//! Interrupt controller abstraction

/// Interrupt controller trait
///
/// Device drivers use this to attach their handler to an interrupt line
/// and unmask it. Priority, trigger type and dispatch are the
/// controller's business.
pub trait InterruptHal {
    /// Attaches `handler` to interrupt line `irq`
    ///
    /// Replaces any handler previously connected to the same line.
    fn connect(&mut self, irq: u32, handler: fn());

    /// Unmasks interrupt line `irq`
    fn enable_irq(&mut self, irq: u32);

    /// Masks interrupt line `irq`
    fn disable_irq(&mut self, irq: u32);

    /// Returns whether interrupt line `irq` is unmasked
    fn irq_enabled(&self, irq: u32) -> bool;
}
