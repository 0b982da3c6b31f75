//! Polling scheduler loop.
//!
//! Each iteration: read the clock, release due jobs and build the ready set,
//! ask the policy for a job, then either idle for one quantum or run the
//! chosen job to completion and update its statistics. The loop stops once
//! the clock reaches the configured horizon.
use log::{debug, info, trace};

use crate::clock::Clock;
use crate::config::{validate_taskset, SimConfig, TaskConfig};
use crate::error::ConfigResult;
use crate::policy::Policy;
use crate::ready::build_ready_list;
use crate::report::Report;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    IdleWait,
    Terminated,
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    Ran(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub iterations: u64,
    pub idle_polls: u64,
    pub dispatches: u64,
    /// Dispatches of a different task than the previous one.
    pub context_switches: u64,
}

pub struct Scheduler<C: Clock, const N: usize> {
    tasks: [Task; N],
    policy: Policy,
    clock: C,
    config: SimConfig,
    state: SimState,
    last_task: Option<usize>,
    stats: SchedulerStats,
}

impl<C: Clock, const N: usize> Scheduler<C, N> {
    /// Build a scheduler over a validated task set.
    pub fn new(configs: [TaskConfig; N], policy: Policy, clock: C, config: SimConfig) -> ConfigResult<Self> {
        validate_taskset(&configs)?;
        config.validate()?;

        let tasks = configs.map(|c| Task::new(&c));

        Ok(Self {
            tasks,
            policy,
            clock,
            config,
            state: SimState::Running,
            last_task: None,
            stats: SchedulerStats::default(),
        })
    }

    pub fn tasks(&self) -> &[Task; N] {
        &self.tasks
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Hand the clock back, e.g. to reuse a hardware timer for the next run.
    pub fn into_clock(self) -> C {
        self.clock
    }

    /// Run one iteration at time `now_ms`.
    pub fn step(&mut self, now_ms: f64) -> Step {
        self.stats.iterations += 1;

        let ready = build_ready_list(&mut self.tasks, now_ms);
        match self.policy.select(&mut self.tasks, &ready) {
            None => {
                self.state = SimState::IdleWait;
                self.stats.idle_polls += 1;
                self.clock.idle(self.config.idle_quantum_ms);
                self.state = SimState::Running;
                Step::Idle
            }
            Some(idx) => {
                self.dispatch(idx);
                Step::Ran(idx)
            }
        }
    }

    /// Run the selected job to completion.
    fn dispatch(&mut self, idx: usize) {
        if let Some(prev) = self.last_task {
            if prev != idx {
                self.stats.context_switches += 1;
            }
        }
        self.last_task = Some(idx);
        self.stats.dispatches += 1;

        let computation = self.tasks[idx].computation_ms;
        let start = self.clock.now_ms();
        self.clock.consume(computation);
        let finish = self.clock.now_ms();

        let t = &mut self.tasks[idx];
        let met = t.complete_job(start, finish);
        if self.policy.tracks_window() {
            t.advance_window(true);
        }

        trace!("run task={} start={:.3} finish={:.3}", idx, start, finish);
        if !met {
            debug!(
                "deadline miss task={} finish={:.3} deadline={:.3}",
                idx, finish, t.absolute_deadline_ms
            );
        }
    }

    /// Run until the configured horizon and return the final counters.
    pub fn run(&mut self) -> Report<N> {
        let start = self.clock.now_ms();
        let end = start + self.config.duration_ms;
        for t in self.tasks.iter_mut() {
            t.anchor(start);
        }
        self.state = SimState::Running;

        info!(
            "{} scheduler starting: {} tasks, {:.0} ms horizon",
            self.policy, N, self.config.duration_ms
        );

        loop {
            let now = self.clock.now_ms();
            if now >= end {
                break;
            }
            self.step(now);
        }
        self.state = SimState::Terminated;

        let elapsed = self.clock.now_ms() - start;
        Report::new(self.policy, elapsed, self.stats, &self.tasks)
    }
}
