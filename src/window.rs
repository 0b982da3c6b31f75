//! Sliding (m,k) window.
//!
//! A ring of the last `k` job outcomes with a running count of hits.
//! `k == 0` disables the window: every operation is then a no-op.

use crate::config::MAX_WINDOW;

/// Outcome of one job as seen by the (m,k) window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Skipped (or never recorded).
    #[default]
    Miss,
    /// Executed.
    Hit,
}

#[derive(Debug, Clone, Copy)]
pub struct Window {
    history: [Outcome; MAX_WINDOW],
    k: usize,
    m: usize,
    pos: usize,
    successes: usize,
}

impl Window {
    /// Empty window. Callers validate `m <= k <= MAX_WINDOW` beforehand;
    /// `k` is clamped here so the ring can never be indexed out of range.
    pub const fn new(m: usize, k: usize) -> Self {
        let k = if k > MAX_WINDOW { MAX_WINDOW } else { k };
        Self {
            history: [Outcome::Miss; MAX_WINDOW],
            k,
            m,
            pos: 0,
            successes: 0,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// Whether (m,k)-firm handling applies at all.
    pub fn is_enabled(&self) -> bool {
        self.k > 0 && self.m > 0
    }

    /// Slot the next outcome will overwrite.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of hits currently held in the window.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Record one outcome, evicting the oldest.
    pub fn advance(&mut self, executed: bool) {
        if self.k == 0 {
            return;
        }

        let old = self.history[self.pos];
        if old == Outcome::Hit && self.successes > 0 {
            self.successes -= 1;
        }

        self.history[self.pos] = if executed { Outcome::Hit } else { Outcome::Miss };
        if executed {
            self.successes += 1;
        }

        self.pos = (self.pos + 1) % self.k;
    }

    /// A job may be skipped when the window already holds `m` hits and
    /// still holds `m` after the oldest slot is overwritten by the miss.
    /// Stricter than a plain `successes >= m` test, which can evict a hit
    /// and leave only `m - 1` in the window.
    pub fn can_skip(&self) -> bool {
        if !self.is_enabled() || self.successes < self.m {
            return false;
        }
        let evicted = usize::from(self.history[self.pos] == Outcome::Hit);
        self.successes - evicted >= self.m
    }

    /// Outcomes oldest first.
    pub fn outcomes(&self) -> impl Iterator<Item = Outcome> + '_ {
        let k = self.k;
        (0..k).map(move |i| self.history[(self.pos + i) % k])
    }

    /// Hits counted straight from the ring.
    pub fn count_hits(&self) -> usize {
        self.history[..self.k]
            .iter()
            .filter(|&&o| o == Outcome::Hit)
            .count()
    }
}
