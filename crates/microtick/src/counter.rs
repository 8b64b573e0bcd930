//! Hardware counter capability consumed by the countdown state machine.

use crate::profile::CounterProfile;

/// Minimal contract a platform's counting hardware exposes.
///
/// An adapter owns one timer/counter peripheral and reduces it to four
/// operations; everything else about the part (register layout, clock
/// distribution, interrupt vectoring) stays inside the adapter crate. The
/// platform's interrupt handler completes the contract by calling
/// [`Timer::on_notification`](crate::timer::Timer::on_notification) once per
/// qualifying hardware event.
///
/// All methods are called with the schedule's critical section held and must
/// perform only bounded, non-blocking work.
pub trait Counter {
    /// Describe the counter this adapter drives.
    fn profile(&self) -> CounterProfile;

    /// Select the divisor table entry counting proceeds at.
    ///
    /// `index` refers to the profile's divisor table and is always in range.
    fn select_divisor(&mut self, index: usize);

    /// Program the counter so the next notification arrives after exactly
    /// `ticks` ticks, and start counting.
    ///
    /// `ticks` is never zero and never exceeds the profile's range;
    /// `load_count(range)` programs a complete cycle. The counting polarity
    /// (up-counter preload of `range - ticks`, compare-match target, or
    /// auto-reload down-counter) is this adapter's concern, applied here
    /// once per platform rather than recomputed by the core.
    fn load_count(&mut self, ticks: u64);

    /// Allow notifications to reach the state machine.
    fn enable_notification(&mut self);

    /// Stop notifications; counting may halt as a side effect.
    fn disable_notification(&mut self);
}
