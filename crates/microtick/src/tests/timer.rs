use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;

use crate::schedule::ScheduleKind;
use crate::tests::{eight_bit_profile, FakeCounter};
use crate::timer::Timer;

fn new_timer() -> Timer<FakeCounter> {
    Timer::new(FakeCounter::new(eight_bit_profile()))
}

static TIMEOUT_FIRES: AtomicUsize = AtomicUsize::new(0);
fn count_timeout() {
    TIMEOUT_FIRES.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn timeout_fires_exactly_once() {
    let timer = new_timer();

    // 16384 µs is exactly one full cycle at the coarsest divisor: one
    // notification reaches the terminal tick.
    timer.set_timeout_us(count_timeout, 16_384);
    assert_eq!(timer.kind(), ScheduleKind::Timeout);

    timer.on_notification();
    assert_eq!(TIMEOUT_FIRES.load(Ordering::SeqCst), 1);
    assert_eq!(timer.kind(), ScheduleKind::Off);

    // Anything delivered after disarm is spurious and absorbed.
    timer.on_notification();
    timer.on_notification();
    assert_eq!(TIMEOUT_FIRES.load(Ordering::SeqCst), 1);
}

static INTERVAL_FIRES: AtomicUsize = AtomicUsize::new(0);
fn count_interval() {
    INTERVAL_FIRES.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn interval_fires_once_per_period() {
    let timer = new_timer();

    // 1 s decomposes to 61 overflows + 9 remainder ticks: 62 notifications
    // per period (61 overflow cycles, then the remainder cycle).
    timer.set_interval_s(count_interval, 1);

    for period in 1..=3 {
        for _ in 0..61 {
            timer.on_notification();
        }
        assert_eq!(INTERVAL_FIRES.load(Ordering::SeqCst), period - 1);
        timer.on_notification();
        assert_eq!(INTERVAL_FIRES.load(Ordering::SeqCst), period);
        assert_eq!(timer.kind(), ScheduleKind::Interval);
    }
}

static LOSER_FIRES: AtomicUsize = AtomicUsize::new(0);
fn count_loser() {
    LOSER_FIRES.fetch_add(1, Ordering::SeqCst);
}

static WINNER_FIRES: AtomicUsize = AtomicUsize::new(0);
fn count_winner() {
    WINNER_FIRES.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn new_schedule_supersedes_armed_one() {
    let timer = new_timer();

    timer.set_interval_s(count_loser, 1);
    for _ in 0..10 {
        timer.on_notification();
    }

    // Replace mid-countdown: the old decomposition never fires.
    timer.set_timeout_us(count_winner, 16_350);
    timer.on_notification();

    assert_eq!(LOSER_FIRES.load(Ordering::SeqCst), 0);
    assert_eq!(WINNER_FIRES.load(Ordering::SeqCst), 1);
    assert!(!timer.is_armed());
}

static ZERO_FIRES: AtomicUsize = AtomicUsize::new(0);
fn count_zero() {
    ZERO_FIRES.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn zero_duration_refuses_to_arm_and_clears() {
    let timer = new_timer();

    timer.set_interval_us(count_zero, 50_000);
    assert!(timer.is_armed());

    // The zero request still runs clear-first semantics.
    timer.set_timeout_us(count_zero, 0);
    assert!(!timer.is_armed());

    timer.set_interval_s(count_zero, 0);
    assert!(!timer.is_armed());

    for _ in 0..5 {
        timer.on_notification();
    }
    assert_eq!(ZERO_FIRES.load(Ordering::SeqCst), 0);
}

static CLEARING_TIMER: Lazy<Timer<FakeCounter>> = Lazy::new(new_timer);
static CLEARING_FIRES: AtomicUsize = AtomicUsize::new(0);
fn clear_own_schedule() {
    CLEARING_FIRES.fetch_add(1, Ordering::SeqCst);
    CLEARING_TIMER.clear_timer();
}

#[test]
fn callback_may_clear_its_own_interval() {
    // 16350 µs fits one cycle: every period is a single notification.
    CLEARING_TIMER.set_interval_us(clear_own_schedule, 16_350);

    CLEARING_TIMER.on_notification();
    assert_eq!(CLEARING_FIRES.load(Ordering::SeqCst), 1);
    // The clear from inside the fire step suppressed the re-arm.
    assert!(!CLEARING_TIMER.is_armed());

    for _ in 0..3 {
        CLEARING_TIMER.on_notification();
    }
    assert_eq!(CLEARING_FIRES.load(Ordering::SeqCst), 1);
}

static CHAINING_TIMER: Lazy<Timer<FakeCounter>> = Lazy::new(new_timer);
static CHAIN_FIRST: AtomicUsize = AtomicUsize::new(0);
static CHAIN_SECOND: AtomicUsize = AtomicUsize::new(0);
fn chain_first() {
    CHAIN_FIRST.fetch_add(1, Ordering::SeqCst);
    CHAINING_TIMER.set_timeout_us(chain_second, 16_384);
}
fn chain_second() {
    CHAIN_SECOND.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn callback_may_arm_the_next_schedule() {
    CHAINING_TIMER.set_timeout_us(chain_first, 16_350);

    // First fire arms the follow-up from within the callback; the stale
    // post-fire disarm must not tear it down.
    CHAINING_TIMER.on_notification();
    assert_eq!(CHAIN_FIRST.load(Ordering::SeqCst), 1);
    assert_eq!(CHAINING_TIMER.kind(), ScheduleKind::Timeout);

    CHAINING_TIMER.on_notification();
    assert_eq!(CHAIN_SECOND.load(Ordering::SeqCst), 1);
    assert!(!CHAINING_TIMER.is_armed());
}
