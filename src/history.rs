//! Undo/redo history for editor documents
//!
//! Linear, bounded log of whole-document snapshots kept independently of the
//! host editor's own history, plus the debouncer that coalesces change events
//! before a snapshot is taken.

mod debouncer;
mod tracker;

pub use debouncer::{DEFAULT_HISTORY_DEBOUNCE_MS, HistoryDebouncer};
pub use tracker::{DEFAULT_MAX_HISTORY, HistoryMode, HistoryTracker};
