//! Reference constants and validated configuration.

use crate::error::{ConfigError, ConfigResult};

/// Upper bound on the task set size.
pub const MAX_TASKS: usize = 3;

/// Upper bound on the (m,k) window length.
pub const MAX_WINDOW: usize = 8;

/// Default simulated horizon (ms).
pub const SIM_DURATION_MS: f64 = 20_000.0;

/// Sleep used when nothing is ready (ms).
pub const IDLE_QUANTUM_MS: f64 = 0.5;

/// Inner spin count between clock reads while burning execution time.
pub const BUSY_LOOP_FACTOR: u32 = 1000;

/// Static description of one periodic task.
///
/// `k == 0` or `m == 0` turns (m,k)-firm handling off for the task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskConfig {
    pub period_ms: f64,
    pub deadline_ms: f64,
    pub computation_ms: f64,
    pub k: usize,
    pub m: usize,
}

impl TaskConfig {
    /// Plain periodic task without (m,k) constraints.
    pub const fn new(period_ms: f64, deadline_ms: f64, computation_ms: f64) -> Self {
        Self {
            period_ms,
            deadline_ms,
            computation_ms,
            k: 0,
            m: 0,
        }
    }

    /// Attach an (m,k)-firm constraint: at least `m` of any `k` consecutive jobs.
    pub const fn with_mk(mut self, m: usize, k: usize) -> Self {
        self.m = m;
        self.k = k;
        self
    }

    /// Utilization contributed by this task (C / T).
    pub fn utilization(&self) -> f64 {
        self.computation_ms / self.period_ms
    }

    /// Check the task parameters. `index` is only used for error reporting.
    pub fn validate(&self, index: usize) -> ConfigResult<()> {
        if !positive(self.period_ms) {
            return Err(ConfigError::InvalidPeriod(index));
        }
        if !positive(self.deadline_ms) {
            return Err(ConfigError::InvalidDeadline(index));
        }
        if !(self.computation_ms.is_finite() && self.computation_ms >= 0.0) {
            return Err(ConfigError::InvalidComputation(index));
        }
        if self.k > MAX_WINDOW {
            return Err(ConfigError::WindowTooLarge(index));
        }
        if self.m > self.k {
            return Err(ConfigError::FirmExceedsWindow(index));
        }
        Ok(())
    }
}

/// Simulation-wide parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub duration_ms: f64,
    pub idle_quantum_ms: f64,
}

impl SimConfig {
    pub const fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            idle_quantum_ms: IDLE_QUANTUM_MS,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !positive(self.duration_ms) {
            return Err(ConfigError::InvalidDuration);
        }
        if !positive(self.idle_quantum_ms) {
            return Err(ConfigError::InvalidIdleQuantum);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(SIM_DURATION_MS)
    }
}

/// Task set used by the demo runners: (period, deadline, computation, m, k).
/// Total utilization is 0.85, so RMS and EDF both fit; the (m,k) run
/// shows how much slack the skips free up.
pub const REFERENCE_TASKSET: [TaskConfig; MAX_TASKS] = [
    TaskConfig::new(20.0, 20.0, 5.0).with_mk(3, 4),
    TaskConfig::new(50.0, 50.0, 15.0).with_mk(3, 5),
    TaskConfig::new(100.0, 100.0, 30.0).with_mk(5, 8),
];

/// Validate a whole task set.
pub fn validate_taskset(configs: &[TaskConfig]) -> ConfigResult<()> {
    if configs.is_empty() {
        return Err(ConfigError::NoTasks);
    }
    if configs.len() > MAX_TASKS {
        return Err(ConfigError::TooManyTasks);
    }
    configs
        .iter()
        .enumerate()
        .try_for_each(|(i, c)| c.validate(i))
}

#[inline]
fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
