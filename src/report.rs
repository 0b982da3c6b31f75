//! End-of-run summary.

use log::info;

use crate::policy::Policy;
use crate::scheduler::SchedulerStats;
use crate::task::Task;

/// Final counters of one task plus the derived means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSummary {
    pub id: usize,
    pub jobs_finished: u32,
    pub deadlines_missed: u32,
    pub jobs_skipped: u32,
    pub total_exec_ms: f64,
    pub total_response_ms: f64,
}

impl TaskSummary {
    /// `id` is the task's index in the task set.
    pub fn from_task(id: usize, t: &Task) -> Self {
        Self {
            id,
            jobs_finished: t.jobs_finished,
            deadlines_missed: t.deadlines_missed,
            jobs_skipped: t.jobs_skipped,
            total_exec_ms: t.total_exec_ms,
            total_response_ms: t.total_response_ms,
        }
    }

    /// Jobs that actually ran.
    pub fn jobs_executed(&self) -> u32 {
        self.jobs_finished - self.jobs_skipped
    }

    /// Mean execution time over executed jobs.
    pub fn mean_exec_ms(&self) -> f64 {
        mean(self.total_exec_ms, self.jobs_executed())
    }

    /// Mean response time over executed jobs.
    pub fn mean_response_ms(&self) -> f64 {
        mean(self.total_response_ms, self.jobs_executed())
    }

    pub fn miss_ratio(&self) -> f64 {
        if self.jobs_finished == 0 {
            0.0
        } else {
            self.deadlines_missed as f64 / self.jobs_finished as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report<const N: usize> {
    pub policy: Policy,
    pub elapsed_ms: f64,
    pub stats: SchedulerStats,
    pub tasks: [TaskSummary; N],
}

impl<const N: usize> Report<N> {
    pub fn new(policy: Policy, elapsed_ms: f64, stats: SchedulerStats, tasks: &[Task; N]) -> Self {
        Self {
            policy,
            elapsed_ms,
            stats,
            tasks: core::array::from_fn(|i| TaskSummary::from_task(i, &tasks[i])),
        }
    }

    pub fn total_misses(&self) -> u32 {
        self.tasks.iter().map(|t| t.deadlines_missed).sum()
    }

    pub fn total_finished(&self) -> u32 {
        self.tasks.iter().map(|t| t.jobs_finished).sum()
    }

    /// Emit the report at info level.
    pub fn log(&self) {
        info!("=== {} results ({:.1} ms) ===", self.policy, self.elapsed_ms);
        info!(
            "dispatches={} idle_polls={} switches={}",
            self.stats.dispatches, self.stats.idle_polls, self.stats.context_switches
        );
        for t in &self.tasks {
            info!(
                "  task {}: finished={} missed={} skipped={} avg_exec={:.3} ms avg_resp={:.3} ms",
                t.id,
                t.jobs_finished,
                t.deadlines_missed,
                t.jobs_skipped,
                t.mean_exec_ms(),
                t.mean_response_ms()
            );
        }
    }
}

#[inline]
fn mean(total: f64, n: u32) -> f64 {
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(finished: u32, missed: u32, skipped: u32) -> TaskSummary {
        TaskSummary {
            id: 0,
            jobs_finished: finished,
            deadlines_missed: missed,
            jobs_skipped: skipped,
            total_exec_ms: 12.0,
            total_response_ms: 30.0,
        }
    }

    #[test]
    fn means_exclude_skipped_jobs() {
        let s = summary(6, 2, 2);
        assert_eq!(s.jobs_executed(), 4);
        assert_eq!(s.mean_exec_ms(), 3.0);
        assert_eq!(s.mean_response_ms(), 7.5);
        assert!((s.miss_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_summary_has_zero_means() {
        let s = TaskSummary {
            total_exec_ms: 0.0,
            total_response_ms: 0.0,
            ..summary(0, 0, 0)
        };
        assert_eq!(s.mean_exec_ms(), 0.0);
        assert_eq!(s.mean_response_ms(), 0.0);
        assert_eq!(s.miss_ratio(), 0.0);
    }
}
