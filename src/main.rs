//! (m,k)-firm RTOS scheduler — bare-metal entry point.
//!
//! Runs on ARM Cortex-M4 (STM32F411) under QEMU. SysTick provides a 1 ms
//! time base; the reference task set is scheduled under RMS, EDF and
//! (m,k)-firm in turn. Output goes via semihosting to the QEMU console.
//!
//! Build with `--features cortex-m-demo --target thumbv7em-none-eabihf`.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::{entry, exception};
use cortex_m_semihosting::debug;
use log::{error, info, LevelFilter};
use panic_halt as _;

use rtos_mk::config::BUSY_LOOP_FACTOR;
use rtos_mk::logger;
use rtos_mk::{Clock, Policy, Scheduler, SimConfig, REFERENCE_TASKSET};

/// HSI default after reset.
const SYSCLK_HZ: u32 = 16_000_000;
const TICKS_PER_MS: u32 = SYSCLK_HZ / 1000;

static MILLIS: AtomicU32 = AtomicU32::new(0);

#[exception]
fn SysTick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

/// Millisecond clock from the SysTick counter, with sub-millisecond
/// resolution taken from the current reload value.
struct SysTickClock {
    _syst: SYST,
}

impl SysTickClock {
    fn new(mut syst: SYST) -> Self {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(TICKS_PER_MS - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();
        Self { _syst: syst }
    }
}

impl Clock for SysTickClock {
    fn now_ms(&mut self) -> f64 {
        // retry if the tick interrupt lands between the two reads
        loop {
            let ms = MILLIS.load(Ordering::Acquire);
            let cvr = SYST::get_current();
            if MILLIS.load(Ordering::Acquire) == ms {
                let frac = (TICKS_PER_MS - 1 - cvr) as f64 / TICKS_PER_MS as f64;
                return ms as f64 + frac;
            }
        }
    }

    fn consume(&mut self, duration_ms: f64) {
        let end = self.now_ms() + duration_ms;
        let mut x: u32 = 0;
        while self.now_ms() < end {
            for i in 0..BUSY_LOOP_FACTOR {
                x = core::hint::black_box(x.wrapping_add(i));
            }
        }
    }

    fn idle(&mut self, duration_ms: f64) {
        let end = self.now_ms() + duration_ms;
        while self.now_ms() < end {
            cortex_m::asm::wfi();
        }
    }
}

#[entry]
fn main() -> ! {
    let _ = logger::init_semihosting(LevelFilter::Info);

    info!("========================================");
    info!("  (m,k)-firm RTOS Scheduler — Cortex-M4");
    info!("========================================");

    let cp = cortex_m::Peripherals::take();
    let Some(cp) = cp else {
        error!("core peripherals already taken");
        debug::exit(debug::EXIT_FAILURE);
        loop {}
    };
    let mut clock = Some(SysTickClock::new(cp.SYST));

    for policy in Policy::ALL {
        let Some(c) = clock.take() else { break };
        match Scheduler::new(REFERENCE_TASKSET, policy, c, SimConfig::default()) {
            Ok(mut sched) => {
                sched.run().log();
                clock = Some(sched.into_clock());
            }
            Err(e) => {
                error!("{}: {}", policy, e);
                debug::exit(debug::EXIT_FAILURE);
            }
        }
    }

    info!("Scheduler finished. Halting.");
    debug::exit(debug::EXIT_SUCCESS);

    loop {}
}
