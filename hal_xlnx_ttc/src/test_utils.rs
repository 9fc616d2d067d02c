//! Test doubles for the driver's kernel-side collaborators

use std::collections::BTreeMap;
use std::sync::Mutex;

use hal::{InterruptHal, TickAnnouncer};

/// Tick announcer that records every announcement
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    announcements: Mutex<Vec<u32>>,
}

impl RecordingAnnouncer {
    /// Creates an announcer with no recorded announcements
    pub const fn new() -> Self {
        Self {
            announcements: Mutex::new(Vec::new()),
        }
    }

    /// Returns every announcement in order
    pub fn announcements(&self) -> Vec<u32> {
        self.lock().clone()
    }

    /// Returns the most recent announcement
    pub fn last(&self) -> Option<u32> {
        self.lock().last().copied()
    }

    /// Returns the sum of all announced ticks
    pub fn total_ticks(&self) -> u64 {
        self.lock().iter().map(|&t| u64::from(t)).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u32>> {
        self.announcements
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TickAnnouncer for RecordingAnnouncer {
    fn announce(&self, ticks: u32) {
        self.lock().push(ticks);
    }
}

/// Fake interrupt controller
///
/// Remembers which handler is connected to which line and which lines
/// are unmasked.
#[derive(Debug, Default)]
pub struct FakeInterruptController {
    handlers: BTreeMap<u32, fn()>,
    enabled: BTreeMap<u32, bool>,
}

impl FakeInterruptController {
    /// Creates a controller with no connected lines
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handler connected to `irq`
    pub fn handler(&self, irq: u32) -> Option<fn()> {
        self.handlers.get(&irq).copied()
    }

    /// Runs the handler connected to `irq` if the line is unmasked
    ///
    /// Returns whether a handler ran.
    pub fn fire(&self, irq: u32) -> bool {
        match self.handlers.get(&irq) {
            Some(handler) if self.irq_enabled(irq) => {
                handler();
                true
            }
            _ => false,
        }
    }
}

impl InterruptHal for FakeInterruptController {
    fn connect(&mut self, irq: u32, handler: fn()) {
        self.handlers.insert(irq, handler);
    }

    fn enable_irq(&mut self, irq: u32) {
        self.enabled.insert(irq, true);
    }

    fn disable_irq(&mut self, irq: u32) {
        self.enabled.insert(irq, false);
    }

    fn irq_enabled(&self, irq: u32) -> bool {
        self.enabled.get(&irq).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static FIRED: AtomicU32 = AtomicU32::new(0);

    fn count_fire() {
        FIRED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_recording_announcer() {
        let announcer = RecordingAnnouncer::new();
        assert_eq!(announcer.last(), None);

        announcer.announce(1);
        announcer.announce(5);

        assert_eq!(announcer.announcements(), vec![1, 5]);
        assert_eq!(announcer.last(), Some(5));
        assert_eq!(announcer.total_ticks(), 6);
    }

    #[test]
    fn test_interrupt_controller_masking() {
        let mut irq = FakeInterruptController::new();
        irq.connect(68, count_fire);
        assert!(!irq.irq_enabled(68));
        assert!(!irq.fire(68));

        irq.enable_irq(68);
        assert!(irq.fire(68));
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);

        irq.disable_irq(68);
        assert!(!irq.fire(68));
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unconnected_line() {
        let mut irq = FakeInterruptController::new();
        irq.enable_irq(3);
        assert!(irq.handler(3).is_none());
        assert!(!irq.fire(3));
    }
}
