#![no_std]

//! ARM Cortex-M SysTick adapter for `microtick`.
//!
//! SysTick is a 24-bit auto-reload down-counter present on every Cortex-M
//! part. Its clock source select yields a two-entry divisor table: the
//! processor clock itself and the external reference clock, which on the
//! common implementations is the processor clock divided by eight. Interrupt
//! vector wiring stays with the firmware; the `SysTick` exception handler
//! forwards to [`Timer::on_notification`](microtick::Timer::on_notification).

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use microtick::{Counter, CounterProfile};

#[cfg(test)]
extern crate std;

/// Divisor table: processor clock, then the /8 external reference clock.
pub const SYSTICK_DIVISORS: &[u32] = &[1, 8];

/// SysTick counter width in bits.
pub const SYSTICK_WIDTH: u32 = 24;

const RELOAD_MASK: u32 = 0x00FF_FFFF;

/// Profile of the SysTick counter on a core clocked at `core_hz`.
pub const fn systick_profile(core_hz: u32) -> CounterProfile {
    CounterProfile::new(SYSTICK_WIDTH, core_hz, SYSTICK_DIVISORS)
}

/// [`Counter`] adapter owning the SysTick peripheral.
pub struct SysTickCounter {
    syst: SYST,
    core_hz: u32,
}

impl SysTickCounter {
    /// Take ownership of SysTick; counting and notifications start disabled.
    pub fn new(mut syst: SYST, core_hz: u32) -> Self {
        syst.disable_interrupt();
        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        Self { syst, core_hz }
    }

    /// Release the peripheral.
    pub fn free(self) -> SYST {
        self.syst
    }
}

impl Counter for SysTickCounter {
    fn profile(&self) -> CounterProfile {
        systick_profile(self.core_hz)
    }

    fn select_divisor(&mut self, index: usize) {
        let source = if index == 0 {
            SystClkSource::Core
        } else {
            SystClkSource::External
        };
        self.syst.set_clock_source(source);
    }

    fn load_count(&mut self, ticks: u64) {
        // Auto-reload down-counter polarity: a reload value of N gives a
        // period of N + 1 ticks, so the full 2^24 range maps to 0xFF_FFFF.
        let reload = ((ticks - 1) as u32) & RELOAD_MASK;
        self.syst.set_reload(reload);
        self.syst.clear_current();
        self.syst.enable_counter();
    }

    fn enable_notification(&mut self) {
        self.syst.enable_interrupt();
    }

    fn disable_notification(&mut self) {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
    }
}
