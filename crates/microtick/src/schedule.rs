//! Countdown state machine advanced once per hardware notification.

use crate::counter::Counter;
use crate::decompose::Decomposition;

/// Kind of the live schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleKind {
    /// Nothing armed; notifications are absorbed.
    #[default]
    Off,
    /// One-shot: fires once, then disarms.
    Timeout,
    /// Repeating: fires once per period, re-armed from the saved
    /// decomposition.
    Interval,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScheduleKind {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ScheduleKind::Off => defmt::write!(fmt, "Off"),
            ScheduleKind::Timeout => defmt::write!(fmt, "Timeout"),
            ScheduleKind::Interval => defmt::write!(fmt, "Interval"),
        }
    }
}

/// A terminal notification's callback, handed out of the critical section.
///
/// The epoch identifies the schedule generation that fired; if the callback
/// starts or clears a schedule, the stale [`Schedule::finish_fire`] is
/// skipped by comparing epochs.
#[derive(Debug, Clone, Copy)]
pub struct Firing {
    /// User callback to invoke, outside any critical section.
    pub callback: fn(),
    /// Schedule generation the firing belongs to.
    pub epoch: u32,
}

/// The single live schedule record.
///
/// Exactly one exists per [`Timer`](crate::timer::Timer); installing a new
/// schedule supersedes the previous one. The countdown phase is encoded by
/// the pending fields: overflows remaining, then a remainder of ticks
/// (`pending_remainder == 0` meaning "already loaded"), then terminal. The
/// `original_*` copy of the decomposition survives consumption so repeating
/// schedules re-arm bit-identically.
#[derive(Debug)]
pub struct Schedule {
    kind: ScheduleKind,
    callback: Option<fn()>,
    pending_overflows: u64,
    pending_remainder: u64,
    original_overflows: u64,
    original_remainder: u64,
    divisor_index: usize,
    epoch: u32,
}

impl Schedule {
    /// A cleared schedule.
    pub const fn new() -> Self {
        Self {
            kind: ScheduleKind::Off,
            callback: None,
            pending_overflows: 0,
            pending_remainder: 0,
            original_overflows: 0,
            original_remainder: 0,
            divisor_index: 0,
            epoch: 0,
        }
    }

    /// Kind of the live schedule.
    pub fn kind(&self) -> ScheduleKind {
        self.kind
    }

    /// Whether a schedule is armed.
    pub fn is_armed(&self) -> bool {
        self.kind != ScheduleKind::Off
    }

    /// Current schedule generation; bumped by every install and clear.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// The saved decomposition the schedule was armed with.
    ///
    /// Survives consumption of the pending countdown; repeating schedules
    /// re-arm from exactly this value.
    pub fn original(&self) -> Decomposition {
        Decomposition {
            divisor_index: self.divisor_index,
            overflows: self.original_overflows,
            remainder: self.original_remainder,
        }
    }

    /// Install a freshly decomposed schedule and start the hardware.
    ///
    /// Supersedes whatever was armed. Passing [`ScheduleKind::Off`] degrades
    /// to [`Schedule::clear`].
    pub fn install<C: Counter>(
        &mut self,
        counter: &mut C,
        kind: ScheduleKind,
        callback: fn(),
        decomposition: Decomposition,
    ) {
        if kind == ScheduleKind::Off {
            self.clear(counter);
            return;
        }

        self.kind = kind;
        self.callback = Some(callback);
        self.pending_overflows = decomposition.overflows;
        self.pending_remainder = decomposition.remainder;
        self.original_overflows = decomposition.overflows;
        self.original_remainder = decomposition.remainder;
        self.divisor_index = decomposition.divisor_index;
        self.epoch = self.epoch.wrapping_add(1);

        counter.select_divisor(decomposition.divisor_index);
        if self.pending_overflows == 0 {
            // Zero-overflow fast path: the remainder phase starts right away.
            self.load_remainder(counter);
        } else {
            let range = counter.profile().range();
            counter.load_count(range);
        }
        counter.enable_notification();
    }

    /// Force the schedule off and silence the hardware. Idempotent.
    pub fn clear<C: Counter>(&mut self, counter: &mut C) {
        self.kind = ScheduleKind::Off;
        self.callback = None;
        self.pending_overflows = 0;
        self.pending_remainder = 0;
        self.original_overflows = 0;
        self.original_remainder = 0;
        self.epoch = self.epoch.wrapping_add(1);
        counter.disable_notification();
    }

    /// Advance the countdown on one hardware notification.
    ///
    /// Returns the callback to fire when the terminal tick has been reached;
    /// the caller invokes it outside the critical section and then completes
    /// the cycle with [`Schedule::finish_fire`] if the epoch still matches.
    /// Notifications while [`ScheduleKind::Off`] are absorbed.
    pub fn advance<C: Counter>(&mut self, counter: &mut C) -> Option<Firing> {
        if self.kind == ScheduleKind::Off {
            return None;
        }

        if self.pending_overflows > 0 {
            self.pending_overflows -= 1;
        }

        if self.pending_overflows == 0 && self.pending_remainder > 0 {
            self.load_remainder(counter);
            None
        } else if self.pending_overflows == 0 && self.pending_remainder == 0 {
            self.callback.map(|callback| Firing {
                callback,
                epoch: self.epoch,
            })
        } else {
            // Still counting overflows: hand the hardware a fresh full cycle
            // for platforms that clear their compare target on every match.
            counter.load_count(counter.profile().range());
            None
        }
    }

    /// Complete a fire step whose callback has returned: disarm a timeout,
    /// re-arm an interval from the saved decomposition.
    ///
    /// Must be skipped when the callback replaced or cleared the schedule
    /// (epoch mismatch); calling it on an `Off` schedule is a no-op.
    pub fn finish_fire<C: Counter>(&mut self, counter: &mut C) {
        match self.kind {
            ScheduleKind::Off => {}
            ScheduleKind::Timeout => self.clear(counter),
            ScheduleKind::Interval => {
                self.pending_overflows = self.original_overflows;
                self.pending_remainder = self.original_remainder;
                if self.pending_overflows == 0 {
                    self.load_remainder(counter);
                } else {
                    counter.load_count(counter.profile().range());
                }
            }
        }
    }

    fn load_remainder<C: Counter>(&mut self, counter: &mut C) {
        counter.load_count(self.pending_remainder);
        self.pending_remainder = 0;
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
