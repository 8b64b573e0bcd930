//! Blinky demo - toggle an LED flag four times a second from a repeating
//! microtick schedule driven by the SysTick counter.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use cortex_m::peripheral::Peripherals;
use cortex_m_rt::{entry, exception};
use critical_section::Mutex;
use microtick::Timer;
use microtick_port_cortex_m::SysTickCounter;
use panic_halt as _;

const CORE_HZ: u32 = 48_000_000;

static LED_ON: AtomicBool = AtomicBool::new(false);

static TIMER: Mutex<RefCell<Option<Timer<SysTickCounter>>>> = Mutex::new(RefCell::new(None));

fn blink() {
    LED_ON.fetch_xor(true, Ordering::Relaxed);
    // Board-specific pin toggling would go here.
}

#[entry]
fn main() -> ! {
    let peripherals = Peripherals::take().unwrap();
    let counter = SysTickCounter::new(peripherals.SYST, CORE_HZ);

    // Park the scheduler in its static before arming, so the first
    // notification cannot race the installation.
    critical_section::with(|cs| {
        let mut slot = TIMER.borrow_ref_mut(cs);
        let timer = slot.insert(Timer::new(counter));
        timer.set_interval_us(blink, 250_000);
    });

    loop {
        cortex_m::asm::wfi();
    }
}

#[exception]
fn SysTick() {
    critical_section::with(|cs| {
        if let Some(timer) = TIMER.borrow_ref(cs).as_ref() {
            timer.on_notification();
        }
    });
}
