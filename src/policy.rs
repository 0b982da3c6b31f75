//! Job selection policies.
//!
//! All three share one contract: given the task array and the ready set
//! (ascending indices), return the index of the job to run next, or `None`
//! when nothing should run. Ties always go to the lowest index, which
//! falls out of scanning the ready set in order with a strict `<`.
//!
//! RMS and EDF are pure. (m,k)-firm first drops every ready job whose
//! window can absorb a miss, then runs EDF over what is left.
use core::fmt;
use core::str::FromStr;

use log::debug;

use crate::error::ConfigError;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Rate-Monotonic: shortest period first.
    Rms,
    /// Earliest-Deadline-First.
    Edf,
    /// (m,k)-firm admission layered on EDF.
    MkFirm,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Rms, Policy::Edf, Policy::MkFirm];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Rms => "RMS",
            Policy::Edf => "EDF",
            Policy::MkFirm => "MK-FIRM",
        }
    }

    /// Whether executed jobs are recorded in the (m,k) window.
    pub fn tracks_window(&self) -> bool {
        *self == Policy::MkFirm
    }

    pub fn select(&self, tasks: &mut [Task], ready: &[usize]) -> Option<usize> {
        match self {
            Policy::Rms => rms(tasks, ready),
            Policy::Edf => edf(tasks, ready),
            Policy::MkFirm => mk_firm(tasks, ready),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rms") {
            Ok(Policy::Rms)
        } else if s.eq_ignore_ascii_case("edf") {
            Ok(Policy::Edf)
        } else if s.eq_ignore_ascii_case("mk") || s.eq_ignore_ascii_case("mk-firm") {
            Ok(Policy::MkFirm)
        } else {
            Err(ConfigError::UnknownPolicy)
        }
    }
}

/// Smallest period wins.
pub fn rms(tasks: &[Task], ready: &[usize]) -> Option<usize> {
    min_by_key(ready.iter().copied(), |i| tasks[i].period_ms)
}

/// Smallest absolute deadline wins.
pub fn edf(tasks: &[Task], ready: &[usize]) -> Option<usize> {
    earliest_deadline(tasks, ready.iter().copied())
}

/// Skip phase, then EDF over the survivors.
pub fn mk_firm(tasks: &mut [Task], ready: &[usize]) -> Option<usize> {
    for &i in ready {
        let t = &mut tasks[i];
        if t.can_skip() {
            t.skip_job();
            debug!(
                "skip task={} window={}/{} (m={})",
                i,
                t.window.successes(),
                t.window.k(),
                t.window.m()
            );
        }
    }

    // skipped jobs are no longer active
    let tasks: &[Task] = tasks;
    earliest_deadline(tasks, ready.iter().copied().filter(|&i| tasks[i].is_job_active()))
}

fn earliest_deadline(tasks: &[Task], candidates: impl Iterator<Item = usize>) -> Option<usize> {
    min_by_key(candidates, |i| tasks[i].absolute_deadline_ms)
}

/// First index with the strictly smallest key.
fn min_by_key(candidates: impl Iterator<Item = usize>, key: impl Fn(usize) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in candidates {
        let k = key(i);
        match best {
            Some((_, best_key)) if k >= best_key => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskConfig;

    fn released(configs: &[TaskConfig], releases: &[f64]) -> [Task; 3] {
        let mut tasks = [
            Task::new(&configs[0]),
            Task::new(&configs[1]),
            Task::new(&configs[2]),
        ];
        for (t, &r) in tasks.iter_mut().zip(releases) {
            t.release_job(r);
        }
        tasks
    }

    #[test]
    fn rms_picks_shortest_period_lowest_index_on_tie() {
        let cfg = [
            TaskConfig::new(50.0, 50.0, 1.0),
            TaskConfig::new(20.0, 20.0, 1.0),
            TaskConfig::new(20.0, 20.0, 1.0),
        ];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        assert_eq!(Policy::Rms.select(&mut tasks, &[0, 1, 2]), Some(1));
        assert_eq!(Policy::Rms.select(&mut tasks, &[0, 2]), Some(2));
        assert_eq!(Policy::Rms.select(&mut tasks, &[0]), Some(0));
    }

    #[test]
    fn rms_ignores_deadlines() {
        let cfg = [
            TaskConfig::new(30.0, 5.0, 1.0),
            TaskConfig::new(10.0, 10.0, 1.0),
            TaskConfig::new(40.0, 40.0, 1.0),
        ];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        assert_eq!(Policy::Rms.select(&mut tasks, &[0, 1, 2]), Some(1));
    }

    #[test]
    fn edf_picks_earliest_deadline() {
        let cfg = [
            TaskConfig::new(10.0, 10.0, 1.0),
            TaskConfig::new(50.0, 50.0, 1.0),
            TaskConfig::new(20.0, 20.0, 1.0),
        ];
        // deadlines: 40, 50, 25
        let mut tasks = released(&cfg, &[30.0, 0.0, 5.0]);
        assert_eq!(Policy::Edf.select(&mut tasks, &[0, 1, 2]), Some(2));
        assert_eq!(Policy::Edf.select(&mut tasks, &[0, 1]), Some(0));
    }

    #[test]
    fn edf_tie_goes_to_lowest_index() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0); 3];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        assert_eq!(Policy::Edf.select(&mut tasks, &[1, 2]), Some(1));
        assert_eq!(Policy::Edf.select(&mut tasks, &[0, 1, 2]), Some(0));
    }

    #[test]
    fn empty_ready_set_selects_nothing() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0).with_mk(1, 2); 3];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        for p in Policy::ALL {
            assert_eq!(p.select(&mut tasks, &[]), None);
        }
    }

    #[test]
    fn mk_without_history_behaves_like_edf() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0).with_mk(2, 4); 3];
        let mut tasks = released(&cfg, &[10.0, 0.0, 5.0]);
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0, 1, 2]), Some(1));
        assert!(tasks.iter().all(|t| t.jobs_skipped == 0));
    }

    #[test]
    fn mk_skips_banked_task_and_runs_the_other() {
        let cfg = [
            TaskConfig::new(10.0, 10.0, 1.0).with_mk(1, 3),
            TaskConfig::new(10.0, 10.0, 1.0).with_mk(1, 3),
            TaskConfig::new(10.0, 10.0, 1.0),
        ];
        let mut tasks = released(&cfg, &[0.0, 5.0, 0.0]);
        tasks[0].advance_window(true);
        // task 0 has the earliest deadline but a banked hit
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0, 1]), Some(1));
        assert_eq!(tasks[0].jobs_skipped, 1);
        assert_eq!(tasks[0].deadlines_missed, 1);
        assert_eq!(tasks[0].jobs_finished, 1);
        assert!(!tasks[0].is_job_active());
        assert_eq!(tasks[1].jobs_skipped, 0);
    }

    #[test]
    fn mk_returns_none_when_everything_is_skipped() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0).with_mk(1, 4); 3];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        for t in tasks.iter_mut() {
            t.advance_window(true);
        }
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0, 1, 2]), None);
        assert!(tasks.iter().all(|t| t.jobs_skipped == 1));
    }

    #[test]
    fn mk_disabled_task_is_never_skipped() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0); 3];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0, 1, 2]), Some(0));
        assert!(tasks.iter().all(|t| t.is_job_active()));
    }

    #[test]
    fn mk_skip_requires_m_successes() {
        let cfg = [TaskConfig::new(10.0, 10.0, 1.0).with_mk(2, 4); 3];
        let mut tasks = released(&cfg, &[0.0, 0.0, 0.0]);
        tasks[0].advance_window(true);
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0]), Some(0));
        tasks[0].advance_window(true);
        assert_eq!(Policy::MkFirm.select(&mut tasks, &[0]), None);
        assert!(tasks[0].window.successes() >= 2);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("rms".parse::<Policy>(), Ok(Policy::Rms));
        assert_eq!("EDF".parse::<Policy>(), Ok(Policy::Edf));
        assert_eq!("mk".parse::<Policy>(), Ok(Policy::MkFirm));
        assert_eq!("fifo".parse::<Policy>(), Err(ConfigError::UnknownPolicy));
    }
}
