//! Drives a `static` timer through its connected interrupt handler, the
//! way a platform wires the driver up.

use hal::{InterruptHal, SystemTimer};
use hal_xlnx_ttc::test_utils::{FakeInterruptController, RecordingAnnouncer};
use hal_xlnx_ttc::{
    regs, ttc_config, FakeTtc, TickMode, TimerConfig, TimerParams, TtcDevice, TtcTimer,
};
use log::LevelFilter;
use simple_logger::SimpleLogger;

const DEVICE: TtcDevice = TtcDevice {
    base_address: 0xF800_1000,
    irq: 42,
    clock_frequency_hz: 1_000_000,
};

const CONFIG: TimerConfig = ttc_config!(
    TimerParams::for_device(&DEVICE, 1_000, TickMode::Periodic).with_cycles_next_min(100)
);

static TIMER: TtcTimer<FakeTtc, RecordingAnnouncer> =
    TtcTimer::new(FakeTtc::new(), RecordingAnnouncer::new(), DEVICE, CONFIG);

fn ttc_isr() {
    TIMER.on_interrupt();
}

#[test]
fn test_static_periodic_timer_through_irq_controller() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Trace).init();

    let mut irq = FakeInterruptController::new();
    TIMER.init(&mut irq, ttc_isr);

    assert_eq!(TIMER.device(), &DEVICE);
    assert!(irq.irq_enabled(TIMER.device().irq));
    assert_eq!(TIMER.bus().match_value(), CONFIG.cycles_per_tick());

    for expected_match in (2..=11).map(|n| n * CONFIG.cycles_per_tick()) {
        TIMER.bus().advance(CONFIG.cycles_per_tick());
        assert!(TIMER.bus().interrupt_pending());
        assert!(irq.fire(DEVICE.irq));
        assert_eq!(TIMER.bus().match_value(), expected_match);
    }

    assert_eq!(TIMER.announcer().announcements(), vec![1; 10]);
    assert_eq!(TIMER.bus().peek(regs::ISR), 0);

    // A masked line never reaches the driver.
    irq.disable_irq(DEVICE.irq);
    TIMER.bus().advance(CONFIG.cycles_per_tick());
    assert!(!irq.fire(DEVICE.irq));
    assert_eq!(TIMER.announcer().total_ticks(), 10);
}
