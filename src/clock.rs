//! Time source and the two ways of spending time.
//!
//! The scheduler never touches hardware timers directly. It reads the
//! clock, burns execution time through `consume`, and parks through `idle`.
//! Both calls block the loop; no other decision can happen meanwhile.

/// Millisecond time base for the simulation loop.
pub trait Clock {
    /// Monotonic time in milliseconds. Never decreases within a run.
    fn now_ms(&mut self) -> f64;

    /// Occupy the CPU for `duration_ms`, standing in for job execution.
    fn consume(&mut self, duration_ms: f64);

    /// Sleep for `duration_ms` when nothing is ready.
    fn idle(&mut self, duration_ms: f64);
}

/// Deterministic clock: time only moves when the scheduler spends it.
///
/// `consume` can be scaled to model jobs that finish faster or slower
/// than their nominal computation time.
#[derive(Debug, Clone, Copy)]
pub struct VirtualClock {
    now_ms: f64,
    exec_scale: f64,
}

impl VirtualClock {
    pub const fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub const fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            exec_scale: 1.0,
        }
    }

    /// Multiply every `consume` by `scale` (0.0 makes execution instantaneous).
    pub const fn with_exec_scale(mut self, scale: f64) -> Self {
        self.exec_scale = scale;
        self
    }

    pub fn elapsed(&self) -> f64 {
        self.now_ms
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now_ms(&mut self) -> f64 {
        self.now_ms
    }

    fn consume(&mut self, duration_ms: f64) {
        if duration_ms > 0.0 {
            self.now_ms += duration_ms * self.exec_scale;
        }
    }

    fn idle(&mut self, duration_ms: f64) {
        if duration_ms > 0.0 {
            self.now_ms += duration_ms;
        }
    }
}

#[cfg(feature = "std")]
pub use host::HostClock;

#[cfg(feature = "std")]
mod host {
    use std::hint::black_box;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::Clock;
    use crate::config::BUSY_LOOP_FACTOR;

    /// Wall clock backed by `Instant`. Execution busy-waits, idling sleeps.
    #[derive(Debug, Clone, Copy)]
    pub struct HostClock {
        origin: Instant,
    }

    impl HostClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
            }
        }
    }

    impl Default for HostClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for HostClock {
        fn now_ms(&mut self) -> f64 {
            self.origin.elapsed().as_secs_f64() * 1000.0
        }

        fn consume(&mut self, duration_ms: f64) {
            let end = self.now_ms() + duration_ms;
            let mut x: u32 = 0;
            while self.now_ms() < end {
                for i in 0..BUSY_LOOP_FACTOR {
                    x = black_box(x.wrapping_add(i));
                }
            }
        }

        fn idle(&mut self, duration_ms: f64) {
            if duration_ms > 0.0 {
                thread::sleep(Duration::from_secs_f64(duration_ms / 1000.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_clock_moves_only_when_spent() {
        let mut c = VirtualClock::new();
        assert_eq!(c.now_ms(), 0.0);
        assert_eq!(c.now_ms(), 0.0);
        c.consume(10.0);
        c.idle(0.5);
        assert_eq!(c.now_ms(), 10.5);
    }

    #[test]
    fn exec_scale_applies_to_consume_only() {
        let mut c = VirtualClock::starting_at(100.0).with_exec_scale(0.0);
        c.consume(25.0);
        assert_eq!(c.now_ms(), 100.0);
        c.idle(1.0);
        assert_eq!(c.elapsed(), 101.0);
    }

    #[test]
    fn negative_durations_do_not_rewind() {
        let mut c = VirtualClock::new();
        c.consume(-3.0);
        c.idle(-1.0);
        assert_eq!(c.now_ms(), 0.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn host_clock_is_monotonic_and_blocks() {
        let mut c = HostClock::new();
        let a = c.now_ms();
        c.consume(2.0);
        let b = c.now_ms();
        assert!(b >= a + 2.0);
        c.idle(1.0);
        assert!(c.now_ms() >= b);
    }
}
