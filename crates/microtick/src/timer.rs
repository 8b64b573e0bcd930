//! Public scheduling facade.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::counter::Counter;
use crate::decompose::{decompose_micros, decompose_secs, Decomposition};
use crate::profile::CounterProfile;
use crate::schedule::{Schedule, ScheduleKind};
use crate::TimerError;

/// One-shot and repeating callback scheduler over a single hardware counter.
///
/// Exactly one schedule is live at a time; arming a new one supersedes the
/// previous one, and clearing is idempotent. Construction is `const`, so
/// firmware owns its instance explicitly (typically in a `static`) and the
/// platform's interrupt handler drives it through
/// [`Timer::on_notification`]:
///
/// ```ignore
/// static TIMER: Timer<SysTickCounter> = Timer::new(counter);
///
/// #[exception]
/// fn SysTick() {
///     TIMER.on_notification();
/// }
///
/// TIMER.set_interval_us(blink, 250_000);
/// ```
///
/// Callbacks execute in interrupt context: they must return promptly and may
/// not block or busy-wait. A callback may start or clear schedules, including
/// its own. A slow callback delays the next scheduled tick; the core offers
/// no other protection against it.
///
/// Foreground mutations and the notification path both run inside a scoped
/// critical section, so a partially written decomposition is never observable
/// from the interrupt side.
pub struct Timer<C: Counter> {
    shared: Mutex<RefCell<Shared<C>>>,
}

struct Shared<C> {
    counter: C,
    schedule: Schedule,
}

/// A requested duration in one of the two supported granularities.
enum Span {
    Micros(u32),
    Secs(u32),
}

impl Span {
    fn decompose(&self, profile: &CounterProfile) -> Result<Decomposition, TimerError> {
        match self {
            Span::Micros(us) => decompose_micros(*us, profile),
            Span::Secs(s) => decompose_secs(*s, profile),
        }
    }
}

impl<C: Counter> Timer<C> {
    /// Wrap `counter` into an unarmed scheduler.
    pub const fn new(counter: C) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                counter,
                schedule: Schedule::new(),
            })),
        }
    }

    /// Arm a one-shot schedule firing `callback` once after `us` microseconds.
    ///
    /// Supersedes any prior schedule. A zero duration arms nothing and leaves
    /// the previous schedule cleared.
    pub fn set_timeout_us(&self, callback: fn(), us: u32) {
        self.arm(callback, ScheduleKind::Timeout, Span::Micros(us));
    }

    /// Arm a one-shot schedule firing `callback` once after `s` seconds.
    pub fn set_timeout_s(&self, callback: fn(), s: u32) {
        self.arm(callback, ScheduleKind::Timeout, Span::Secs(s));
    }

    /// Arm a repeating schedule firing `callback` every `us` microseconds.
    pub fn set_interval_us(&self, callback: fn(), us: u32) {
        self.arm(callback, ScheduleKind::Interval, Span::Micros(us));
    }

    /// Arm a repeating schedule firing `callback` every `s` seconds.
    pub fn set_interval_s(&self, callback: fn(), s: u32) {
        self.arm(callback, ScheduleKind::Interval, Span::Secs(s));
    }

    /// Stop and disarm. Safe to call when already stopped, including from a
    /// callback mid-fire (the pending re-arm is suppressed).
    pub fn clear_timer(&self) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let Shared { counter, schedule } = &mut *shared;
            schedule.clear(counter);
        });
    }

    /// Whether a schedule is currently armed.
    pub fn is_armed(&self) -> bool {
        self.kind() != ScheduleKind::Off
    }

    /// Kind of the live schedule.
    pub fn kind(&self) -> ScheduleKind {
        critical_section::with(|cs| self.shared.borrow_ref(cs).schedule.kind())
    }

    /// Interrupt-context entry point: advance the countdown by one hardware
    /// notification.
    ///
    /// Called by the platform interrupt handler once per qualifying hardware
    /// event. Spurious notifications while nothing is armed are absorbed.
    /// On the terminal tick the user callback runs with the critical section
    /// released, then the schedule disarms (timeout) or re-arms (interval)
    /// unless the callback already replaced it.
    pub fn on_notification(&self) {
        let firing = critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let Shared { counter, schedule } = &mut *shared;
            schedule.advance(counter)
        });

        let Some(firing) = firing else {
            return;
        };

        (firing.callback)();

        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let Shared { counter, schedule } = &mut *shared;
            if schedule.epoch() == firing.epoch {
                schedule.finish_fire(counter);
            }
        });
    }

    fn arm(&self, callback: fn(), kind: ScheduleKind, span: Span) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let Shared { counter, schedule } = &mut *shared;
            // Clear-first semantics: the previous schedule stops even when
            // the new request turns out to be invalid.
            schedule.clear(counter);
            match span.decompose(&counter.profile()) {
                Ok(decomposition) => schedule.install(counter, kind, callback, decomposition),
                // Zero durations are refused silently; nothing is armed.
                Err(TimerError::InvalidDuration) => {}
            }
        });
    }
}
