use crate::config::TaskConfig;
use crate::window::Window;

/// Job state of a periodic task.
/// Ready: a job has been released and has neither finished nor been dropped.
/// Waiting: no active job; the next one is released at `next_release_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Waiting,
    Ready,
}

/// A periodic real-time task and the bookkeeping for its current job.
/// Identity is the index in the scheduler's task array.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    pub period_ms: f64,
    pub relative_deadline_ms: f64,
    pub computation_ms: f64,
    /// Release instant of the current (or last) job.
    pub release_ms: f64,
    /// Always `release_ms + relative_deadline_ms`.
    pub absolute_deadline_ms: f64,
    pub next_release_ms: f64,
    pub state: TaskState,
    pub window: Window,
    pub jobs_finished: u32,
    pub deadlines_missed: u32,
    /// Jobs dropped by (m,k) admission; also counted in the two fields above.
    pub jobs_skipped: u32,
    pub total_exec_ms: f64,
    pub total_response_ms: f64,
}

impl Task {
    pub const fn new(config: &TaskConfig) -> Self {
        Self {
            period_ms: config.period_ms,
            relative_deadline_ms: config.deadline_ms,
            computation_ms: config.computation_ms,
            release_ms: 0.0,
            absolute_deadline_ms: 0.0,
            next_release_ms: 0.0,
            state: TaskState::Waiting,
            window: Window::new(config.m, config.k),
            jobs_finished: 0,
            deadlines_missed: 0,
            jobs_skipped: 0,
            total_exec_ms: 0.0,
            total_response_ms: 0.0,
        }
    }

    /// Schedule the first release at `start_ms`.
    pub fn anchor(&mut self, start_ms: f64) {
        self.next_release_ms = start_ms;
    }

    pub fn is_job_active(&self) -> bool {
        self.state == TaskState::Ready
    }

    /// A release is due when the period boundary has passed and the
    /// previous job is out of the way.
    pub fn release_due(&self, now_ms: f64) -> bool {
        !self.is_job_active() && now_ms >= self.next_release_ms
    }

    /// Release a new job at `release_ms` and compute its absolute deadline.
    /// The following release is one period later, independent of when
    /// the poll that noticed this one happened.
    pub fn release_job(&mut self, release_ms: f64) {
        self.release_ms = release_ms;
        self.absolute_deadline_ms = release_ms + self.relative_deadline_ms;
        self.next_release_ms = release_ms + self.period_ms;
        self.state = TaskState::Ready;
    }

    /// Account for a job that ran from `start_ms` to `finish_ms`.
    /// Returns true if the deadline was met.
    pub fn complete_job(&mut self, start_ms: f64, finish_ms: f64) -> bool {
        self.jobs_finished += 1;
        self.total_exec_ms += finish_ms - start_ms;
        self.total_response_ms += finish_ms - self.release_ms;

        let met = finish_ms <= self.absolute_deadline_ms;
        if !met {
            self.deadlines_missed += 1;
        }
        self.state = TaskState::Waiting;
        met
    }

    /// Drop the active job without running it. Counts as finished and missed.
    pub fn skip_job(&mut self) {
        self.window.advance(false);
        self.jobs_finished += 1;
        self.deadlines_missed += 1;
        self.jobs_skipped += 1;
        self.state = TaskState::Waiting;
    }

    pub fn advance_window(&mut self, executed: bool) {
        self.window.advance(executed);
    }

    pub fn can_skip(&self) -> bool {
        self.window.can_skip()
    }
}
