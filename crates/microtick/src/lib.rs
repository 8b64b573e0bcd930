#![no_std]
#![forbid(unsafe_code)]

//! # microtick
//!
//! One-shot and repeating callback scheduling over a single small hardware
//! counter. A requested microsecond or second interval is decomposed into
//! full counter overflows plus a final partial "remainder" cycle, and an
//! interrupt-driven countdown consumes the overflows one notification at a
//! time, firing the callback at zero and transparently re-arming repeating
//! schedules from the saved decomposition.
//!
//! ## Module Overview
//! - [`profile`]   – Counter descriptions (bit width, base clock, divisors).
//! - [`decompose`] – Prescaler selection and interval decomposition.
//! - [`counter`]   – The hardware capability trait adapters implement.
//! - [`schedule`]  – The countdown state machine advanced per notification.
//! - [`timer`]     – The owning facade wired between foreground code and the
//!   platform interrupt handler.
//!
//! Everything hardware-specific lives behind [`counter::Counter`]; adapter
//! crates under `ports/` implement it per architecture.

#[cfg(any(test, feature = "std"))]
extern crate std;

use core::fmt;

pub mod counter;
pub mod decompose;
pub mod profile;
pub mod schedule;
pub mod timer;

pub use counter::Counter;
pub use decompose::{decompose_micros, decompose_secs, Decomposition};
pub use profile::CounterProfile;
pub use schedule::{Schedule, ScheduleKind};
pub use timer::Timer;

#[cfg(test)]
mod tests;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the crate
pub type TimerResult<T> = Result<T, TimerError>;

/// Error types for scheduling operations
///
/// The interrupt path never reports errors; only schedule-start calls can
/// reject their input, and the [`timer::Timer`] facade downgrades even that
/// to a silent refusal to arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Requested duration is zero
    InvalidDuration,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidDuration => write!(f, "requested duration is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TimerError::InvalidDuration => defmt::write!(fmt, "InvalidDuration"),
        }
    }
}
