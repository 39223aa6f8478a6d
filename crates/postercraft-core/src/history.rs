//! Snapshot-based undo/redo history.

use std::collections::VecDeque;

#[cfg(not(target_arch = "wasm32"))]
use std::time::SystemTime;

#[cfg(target_arch = "wasm32")]
use web_time::SystemTime;

/// One immutable document snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    snapshot: String,
    timestamp: SystemTime,
}

impl HistoryEntry {
    pub fn new(snapshot: String) -> Self {
        Self {
            snapshot,
            timestamp: SystemTime::now(),
        }
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// When the entry was recorded.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

/// Linear, bounded undo/redo history.
///
/// Entries after the cursor are the redo branch; pushing from anywhere but
/// the tip discards them. Once the window is full, each push evicts the
/// oldest entry and the cursor stays where it is.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    /// `None` while the stack is empty.
    current: Option<usize>,
    max_size: usize,
}

impl HistoryStack {
    /// Create a stack holding at most `max_size` entries (at least one).
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: VecDeque::with_capacity(max_size),
            current: None,
            max_size,
        }
    }

    /// Record a snapshot as the new current state.
    pub fn push(&mut self, snapshot: String) {
        let keep = self.current.map_or(0, |i| i + 1);
        if keep < self.entries.len() {
            log::debug!("Discarding {} redo entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }

        self.entries.push_back(HistoryEntry::new(snapshot));
        if self.entries.len() > self.max_size {
            self.entries.pop_front();
            log::debug!("History full, evicted oldest entry");
        } else {
            self.current = Some(self.current.map_or(0, |i| i + 1));
        }
    }

    /// Step back. Returns the snapshot to restore, or `None` at the oldest
    /// entry.
    pub fn undo(&mut self) -> Option<&str> {
        let index = self.current.filter(|&i| i > 0)? - 1;
        self.current = Some(index);
        self.entries.get(index).map(HistoryEntry::snapshot)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the tip.
    pub fn redo(&mut self) -> Option<&str> {
        let index = self.current? + 1;
        if index >= self.entries.len() {
            return None;
        }
        self.current = Some(index);
        self.entries.get(index).map(HistoryEntry::snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_HISTORY)
    }
}
