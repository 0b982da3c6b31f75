//! Periodic task scheduler simulation: Rate-Monotonic, Earliest-Deadline-First
//! and (m,k)-firm admission over EDF.
//!
//! The core is `no_std` and allocation-free. Time comes from a [`Clock`],
//! so the same loop runs under QEMU on a Cortex-M4, on a host with the OS
//! clock, or in tests on a virtual clock.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod clock;
pub mod config;
pub mod error;
pub mod logger;
pub mod policy;
pub mod ready;
pub mod report;
pub mod scheduler;
pub mod task;
pub mod window;

pub use clock::{Clock, VirtualClock};
pub use config::{SimConfig, TaskConfig, MAX_TASKS, MAX_WINDOW, REFERENCE_TASKSET};
pub use error::{ConfigError, ConfigResult};
pub use policy::Policy;
pub use report::{Report, TaskSummary};
pub use scheduler::{Scheduler, SchedulerStats, SimState, Step};
pub use task::{Task, TaskState};
pub use window::{Outcome, Window};

#[cfg(feature = "std")]
pub use clock::HostClock;
