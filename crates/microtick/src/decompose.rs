//! Prescaler selection and interval decomposition.
//!
//! A requested duration is expressed as some number of complete counter
//! cycles ("overflows") plus a final partial cycle ("remainder") at one
//! divisor of the counter's table. The selector prefers the finest divisor
//! whose rounded tick count still fits in a single overflow-free cycle, so a
//! schedule costs one interrupt wherever the hardware allows it; longer
//! durations fall back to counting overflows at the coarsest divisor.

use crate::profile::CounterProfile;
use crate::TimerError;

/// Result of decomposing a duration against a counter profile.
///
/// Computed once per schedule start and reused verbatim on every re-arm of a
/// repeating schedule; rounding is never re-applied, so periods do not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    /// Index into the profile's divisor table.
    pub divisor_index: usize,
    /// Complete counter cycles to consume before the remainder phase.
    pub overflows: u64,
    /// Ticks of the final partial cycle, `0 <= remainder < range`.
    ///
    /// A raw tick count; translating it into the register value the hardware
    /// wants is [`Counter::load_count`](crate::counter::Counter::load_count)'s
    /// job.
    pub remainder: u64,
}

impl Decomposition {
    /// Total ticks this decomposition counts at its divisor's resolution.
    pub fn total_ticks(&self, profile: &CounterProfile) -> u64 {
        self.overflows * profile.range() + self.remainder
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Decomposition {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "div[{}] {}ovf+{}",
            self.divisor_index,
            self.overflows,
            self.remainder
        );
    }
}

/// Decompose a microsecond duration against `profile`.
pub fn decompose_micros(us: u32, profile: &CounterProfile) -> Result<Decomposition, TimerError> {
    decompose(us as u64, 1_000_000, profile)
}

/// Decompose a second duration against `profile`.
///
/// Same arithmetic as the microsecond path with a unit of one; the rounded
/// tick count `s * base_hz / divisor` is exact for integer rates.
pub fn decompose_secs(s: u32, profile: &CounterProfile) -> Result<Decomposition, TimerError> {
    decompose(s as u64, 1, profile)
}

/// Decompose `duration / unit` seconds.
///
/// Fails only for a zero duration; callers arm nothing in that case.
fn decompose(duration: u64, unit: u64, profile: &CounterProfile) -> Result<Decomposition, TimerError> {
    if duration == 0 {
        return Err(TimerError::InvalidDuration);
    }

    let range = profile.range();
    let divisors = profile.divisors();

    // Finest divisor first: the first entry whose rounded tick count fits in
    // one overflow-free cycle wins.
    for (divisor_index, &divisor) in divisors.iter().enumerate() {
        let ticks = ticks_at(duration, unit, profile.base_hz(), divisor);
        if ticks < range {
            return Ok(Decomposition {
                divisor_index,
                overflows: 0,
                // A nonzero duration below one tick still arms one tick.
                remainder: ticks.max(1),
            });
        }
    }

    // Nothing fits in a single cycle: count overflows at the coarsest divisor
    // and split the rounded total. Rounding happens once, on the total, so a
    // remainder that would round up to the full range folds into one more
    // overflow instead of producing a zero-length terminal phase.
    let divisor_index = divisors.len() - 1;
    let ticks = ticks_at(duration, unit, profile.base_hz(), divisors[divisor_index]);
    Ok(Decomposition {
        divisor_index,
        overflows: ticks / range,
        remainder: ticks % range,
    })
}

/// `round(duration * base_hz / (divisor * unit))`, ties rounding up.
fn ticks_at(duration: u64, unit: u64, base_hz: u32, divisor: u32) -> u64 {
    let num = duration as u128 * base_hz as u128;
    let den = divisor as u128 * unit as u128;
    ((2 * num + den) / (2 * den)) as u64
}
