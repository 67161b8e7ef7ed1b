//! Snapshot-based undo/redo log
//!
//! Every entry is the serialized block sequence of the whole document. The
//! log is linear: pushing after an undo discards the redo branch. Entries are
//! deduplicated by content, so saving an unchanged document is a no-op.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::document::{Block, Document};

/// Default number of snapshots kept
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Observable state of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Nothing recorded yet
    Idle,
    /// Snapshots are being taken
    Recording,
    /// Undo/redo or an AI stream is in progress; saves are ignored
    Suppressed,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    snapshot: String,
    hash: u64,
}

impl HistoryEntry {
    fn same_content(&self, snapshot: &str, hash: u64) -> bool {
        self.hash == hash && self.snapshot == snapshot
    }
}

fn content_hash(snapshot: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    snapshot.hash(&mut hasher);
    hasher.finish()
}

/// Bounded linear history of document snapshots
#[derive(Debug)]
pub struct HistoryTracker {
    entries: Vec<HistoryEntry>,
    current_index: usize,
    max_size: usize,
    /// Nesting depth of suppression requests
    suppress_depth: usize,
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryTracker {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: 0,
            max_size: max_size.max(1),
            suppress_depth: 0,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        if self.suppress_depth > 0 {
            HistoryMode::Suppressed
        } else if self.entries.is_empty() {
            HistoryMode::Idle
        } else {
            HistoryMode::Recording
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_depth > 0
    }

    /// Stop recording until a matching `resume`
    pub fn suppress(&mut self) {
        self.suppress_depth += 1;
    }

    pub fn resume(&mut self) {
        self.suppress_depth = self.suppress_depth.saturating_sub(1);
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.current_index < self.entries.len() - 1
    }

    /// Record the document if it differs from the current entry
    ///
    /// Returns true when a new entry was appended.
    pub fn save_to_history(&mut self, document: &Document) -> bool {
        if self.is_suppressed() {
            log::debug!("History suppressed, skipping snapshot");
            return false;
        }

        let snapshot = match serde_json::to_string(document.blocks()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Failed to serialize document for history: {}", e);
                return false;
            }
        };
        self.push_snapshot(snapshot)
    }

    fn push_snapshot(&mut self, snapshot: String) -> bool {
        let hash = content_hash(&snapshot);
        if let Some(current) = self.entries.get(self.current_index)
            && current.same_content(&snapshot, hash)
        {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.current_index + 1);
        }
        self.entries.push(HistoryEntry { snapshot, hash });

        if self.entries.len() > self.max_size {
            let overflow = self.entries.len() - self.max_size;
            self.entries.drain(..overflow);
        }
        self.current_index = self.entries.len() - 1;
        true
    }

    /// Step back to the previous readable snapshot
    ///
    /// Corrupted entries are skipped with a warning. Returns `None` (and
    /// leaves the index untouched) when there is nothing to restore.
    pub fn undo(&mut self) -> Option<Vec<Block>> {
        if !self.can_undo() {
            return None;
        }

        let candidates: Vec<usize> = (0..self.current_index).rev().collect();
        self.restore_first_valid(candidates)
    }

    /// Step forward to the next readable snapshot
    pub fn redo(&mut self) -> Option<Vec<Block>> {
        if !self.can_redo() {
            return None;
        }

        let candidates: Vec<usize> = (self.current_index + 1..self.entries.len()).collect();
        self.restore_first_valid(candidates)
    }

    fn restore_first_valid(&mut self, candidates: Vec<usize>) -> Option<Vec<Block>> {
        for index in candidates {
            match serde_json::from_str::<Vec<Block>>(&self.entries[index].snapshot) {
                Ok(blocks) => {
                    self.current_index = index;
                    return Some(blocks);
                }
                Err(e) => {
                    log::warn!("Skipping corrupted history entry {}: {}", index, e);
                }
            }
        }
        None
    }

    /// Push a raw snapshot, bypassing serialization
    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, snapshot: &str) {
        self.entries.push(HistoryEntry {
            snapshot: snapshot.to_string(),
            hash: content_hash(snapshot),
        });
        self.current_index = self.entries.len() - 1;
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tracker_tests;
