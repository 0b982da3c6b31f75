//! Ready-set construction.

use heapless::Vec;
use log::trace;

use crate::task::Task;

/// Indices of tasks with an active job, in index order.
/// Capacity equals the task count, so it can never overflow.
pub type ReadySet<const N: usize> = Vec<usize, N>;

/// Release every job whose period boundary has arrived, then collect
/// the tasks holding an active job.
pub fn build_ready_list<const N: usize>(tasks: &mut [Task; N], now_ms: f64) -> ReadySet<N> {
    let mut ready = ReadySet::<N>::new();
    for (i, t) in tasks.iter_mut().enumerate() {
        if t.release_due(now_ms) {
            let release = t.next_release_ms;
            t.release_job(release);
            trace!(
                "release task={} at={:.3} deadline={:.3}",
                i,
                release,
                t.absolute_deadline_ms
            );
        }
        if t.is_job_active() {
            // capacity is N, so the push cannot fail
            let pushed = ready.push(i);
            debug_assert!(pushed.is_ok());
        }
    }
    ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskConfig;

    fn tasks() -> [Task; 3] {
        [
            Task::new(&TaskConfig::new(10.0, 10.0, 1.0)),
            Task::new(&TaskConfig::new(20.0, 20.0, 1.0)),
            Task::new(&TaskConfig::new(40.0, 40.0, 1.0)),
        ]
    }

    #[test]
    fn everything_releases_at_start() {
        let mut ts = tasks();
        let ready = build_ready_list(&mut ts, 0.0);
        assert_eq!(ready.as_slice(), &[0, 1, 2]);
        assert_eq!(ts[2].absolute_deadline_ms, 40.0);
    }

    #[test]
    fn empty_before_next_period() {
        let mut ts = tasks();
        build_ready_list(&mut ts, 0.0);
        for (i, t) in ts.iter_mut().enumerate() {
            t.complete_job(i as f64, i as f64 + 1.0);
        }
        assert!(build_ready_list(&mut ts, 5.0).is_empty());
        assert_eq!(build_ready_list(&mut ts, 10.0).as_slice(), &[0]);
        assert_eq!(build_ready_list(&mut ts, 20.0).as_slice(), &[0, 1]);
    }

    #[test]
    fn late_poll_keeps_release_grid() {
        let mut ts = tasks();
        build_ready_list(&mut ts, 0.0);
        ts[0].complete_job(0.0, 1.0);
        // noticed 3 ms late: release stays on the 10 ms grid
        build_ready_list(&mut ts, 13.0);
        assert_eq!(ts[0].release_ms, 10.0);
        assert_eq!(ts[0].absolute_deadline_ms, 20.0);
        assert_eq!(ts[0].next_release_ms, 20.0);
    }

    #[test]
    fn active_job_blocks_release() {
        let mut ts = tasks();
        build_ready_list(&mut ts, 0.0);
        // task 0 still running past its next boundary
        let ready = build_ready_list(&mut ts, 15.0);
        assert_eq!(ready.as_slice(), &[0, 1, 2]);
        assert_eq!(ts[0].release_ms, 0.0);
    }
}
