//! Counter descriptions supplied by platform adapters.

/// Immutable description of the counting hardware behind a
/// [`Counter`](crate::counter::Counter) adapter.
///
/// The counter is characterized by its bit width (which fixes the full
/// counting range), the undivided base clock feeding it, and the ordered
/// divisor table the hardware can select from. Divisors must be listed in
/// increasing order, finest resolution first; the decomposition selector
/// relies on that order when picking the first divisor a duration fits in.
///
/// Tick periods are deliberately not stored: real parts have non-integral
/// nanosecond periods (62.5 ns, 8/21 µs, ...), while `base_hz / divisor` is
/// an exact integer rate, so all duration arithmetic stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterProfile {
    width: u32,
    base_hz: u32,
    divisors: &'static [u32],
}

impl CounterProfile {
    /// Describe a counter of `width` bits clocked at `base_hz` through one of
    /// the `divisors`.
    pub const fn new(width: u32, base_hz: u32, divisors: &'static [u32]) -> Self {
        assert!(width >= 1 && width <= 32, "counter width must be 1..=32 bits");
        assert!(base_hz > 0, "base clock must be nonzero");
        assert!(!divisors.is_empty(), "divisor table must not be empty");
        Self {
            width,
            base_hz,
            divisors,
        }
    }

    /// Counter bit width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Undivided base clock in Hz.
    pub const fn base_hz(&self) -> u32 {
        self.base_hz
    }

    /// Divisor table, finest resolution first.
    pub const fn divisors(&self) -> &'static [u32] {
        self.divisors
    }

    /// Number of ticks in one complete counter cycle (`2^width`).
    pub const fn range(&self) -> u64 {
        1u64 << self.width
    }

    /// Tick rate at the given divisor table entry.
    pub fn tick_hz(&self, index: usize) -> u32 {
        self.base_hz / self.divisors[index]
    }

    /// Longest duration in microseconds one overflow-free cycle can represent
    /// at the given divisor table entry.
    pub fn max_single_cycle_micros(&self, index: usize) -> u64 {
        let ticks = self.range() as u128;
        let period = self.divisors[index] as u128 * 1_000_000;
        (ticks * period / self.base_hz as u128) as u64
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CounterProfile {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{}bit@{}Hz/{}",
            self.width,
            self.base_hz,
            self.divisors
        );
    }
}
