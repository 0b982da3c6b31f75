//! Configuration errors.
//!
//! Everything that can go wrong is caught when the scheduler is built;
//! the polling loop itself never fails.

use core::fmt;

/// Rejected task set or simulation parameters.
///
/// Variants that concern a single task carry its index in the task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Empty task set
    NoTasks,
    /// More tasks than `MAX_TASKS`
    TooManyTasks,
    /// Period is zero, negative or not finite
    InvalidPeriod(usize),
    /// Relative deadline is zero, negative or not finite
    InvalidDeadline(usize),
    /// Computation time is negative or not finite
    InvalidComputation(usize),
    /// `k` exceeds `MAX_WINDOW`
    WindowTooLarge(usize),
    /// `m` exceeds `k`
    FirmExceedsWindow(usize),
    /// Simulated duration is zero, negative or not finite
    InvalidDuration,
    /// Idle quantum is zero, negative or not finite
    InvalidIdleQuantum,
    /// Policy name not one of `rms`, `edf`, `mk`
    UnknownPolicy,
}

impl ConfigError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTasks => "task set is empty",
            Self::TooManyTasks => "task set exceeds MAX_TASKS",
            Self::InvalidPeriod(_) => "period must be positive",
            Self::InvalidDeadline(_) => "relative deadline must be positive",
            Self::InvalidComputation(_) => "computation time must be non-negative",
            Self::WindowTooLarge(_) => "k exceeds MAX_WINDOW",
            Self::FirmExceedsWindow(_) => "m exceeds k",
            Self::InvalidDuration => "simulated duration must be positive",
            Self::InvalidIdleQuantum => "idle quantum must be positive",
            Self::UnknownPolicy => "unknown policy (expected rms, edf or mk)",
        }
    }

    /// Index of the offending task, if the error is task-specific.
    pub fn task(&self) -> Option<usize> {
        match *self {
            Self::InvalidPeriod(i)
            | Self::InvalidDeadline(i)
            | Self::InvalidComputation(i)
            | Self::WindowTooLarge(i)
            | Self::FirmExceedsWindow(i) => Some(i),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.task() {
            Some(i) => write!(f, "task {}: {}", i, self.as_str()),
            None => f.write_str(self.as_str()),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
