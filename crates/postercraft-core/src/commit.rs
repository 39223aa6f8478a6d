//! Deferred history commits.
//!
//! Edits do not push to history directly; they schedule a commit that fires
//! after a delay depending on the kind of edit. The scheduler is polled with
//! an explicit clock so hosts can drive it from their own timer.

use crate::config::{CommitPolicy, EditorConfig};
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Kind of edit, which selects the commit delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// Discrete edits: add, delete, image upload.
    Structural,
    /// Bursty edits: typing, property changes.
    Continuous,
}

#[derive(Debug, Clone, Copy)]
struct PendingCommit {
    kind: EditKind,
    due: Instant,
}

/// Timers for pending history commits.
#[derive(Debug, Clone)]
pub struct CommitScheduler {
    structural_delay: Duration,
    continuous_delay: Duration,
    policy: CommitPolicy,
    pending: Vec<PendingCommit>,
}

impl CommitScheduler {
    pub fn new(structural_delay: Duration, continuous_delay: Duration, policy: CommitPolicy) -> Self {
        Self {
            structural_delay,
            continuous_delay,
            policy,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            Duration::from_millis(config.structural_commit_delay_ms),
            Duration::from_millis(config.continuous_commit_delay_ms),
            config.commit_policy,
        )
    }

    /// Delay applied to an edit kind.
    pub fn delay(&self, kind: EditKind) -> Duration {
        match kind {
            EditKind::Structural => self.structural_delay,
            EditKind::Continuous => self.continuous_delay,
        }
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Schedule a commit for an edit made at `now`.
    pub fn schedule(&mut self, kind: EditKind, now: Instant) {
        if self.policy == CommitPolicy::Coalesce {
            self.pending.retain(|p| p.kind != kind);
        }
        let due = now + self.delay(kind);
        self.pending.push(PendingCommit { kind, due });
        log::trace!("Scheduled {:?} commit, {} pending", kind, self.pending.len());
    }

    /// Remove every timer due at `now` and return how many fired.
    pub fn poll(&mut self, now: Instant) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.due > now);
        let fired = before - self.pending.len();
        if fired > 0 {
            log::debug!("{} commit timer(s) fired", fired);
        }
        fired
    }

    /// Cancel pending timers of one kind. Returns how many were cancelled.
    pub fn cancel(&mut self, kind: EditKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.kind != kind);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Default for CommitScheduler {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
