//! # Undo/Redo History
//!
//! Snapshot-based history over committed documents.
//!
//! ## Design
//!
//! - Every commit records the document before and after it
//! - Undo hands back the `before` snapshot and moves the entry to redo
//! - Redo hands back the `after` snapshot
//! - New entries clear the redo stack
//! - Batches group several commits into one undo step
//!
//! Snapshots are `Arc<Document>` values shared with the block tree, so an
//! entry costs two pointer copies.
//!
//! ## Example
//!
//! ```rust
//! use ednotes_blocks::{Block, Document};
//! use ednotes_editor::History;
//! use std::sync::Arc;
//!
//! let mut history = History::new();
//! let empty = Arc::new(Document::new());
//! let edited = Arc::new(Document::from(vec![Block::paragraph("Hi")]));
//!
//! history.record(empty.clone(), edited.clone(), "Append paragraph");
//! assert_eq!(history.undo(), Some(empty));
//! assert_eq!(history.redo(), Some(edited));
//! ```

use ednotes_blocks::Document;
use std::sync::Arc;

/// One undo step: the documents on either side of one or more commits
#[derive(Debug, Clone)]
pub struct SnapshotBatch {
    pub before: Arc<Document>,
    pub after: Arc<Document>,

    /// Optional description of this batch
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct History {
    /// Applied batches (most recent last)
    undo_stack: Vec<SnapshotBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<SnapshotBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Batch being built between `begin_batch` and `end_batch`
    batching: bool,
    current_batch: Option<SnapshotBatch>,
    batch_description: Option<String>,
}

impl History {
    /// Create a new history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            batching: false,
            current_batch: None,
            batch_description: None,
        }
    }

    /// Record a commit
    pub fn record(
        &mut self,
        before: Arc<Document>,
        after: Arc<Document>,
        description: impl Into<String>,
    ) {
        if self.batching {
            match &mut self.current_batch {
                Some(batch) => batch.after = after,
                None => {
                    self.current_batch = Some(SnapshotBatch {
                        before,
                        after,
                        description: None,
                    })
                }
            }
        } else {
            self.push_batch(SnapshotBatch {
                before,
                after,
                description: Some(description.into()),
            });
        }
    }

    /// Start a batch of commits (undone/redone together)
    pub fn begin_batch(&mut self) {
        self.batching = true;
        self.current_batch = None;
        self.batch_description = None;
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        self.batching = false;
        if let Some(mut batch) = self.current_batch.take() {
            batch.description = self.batch_description.take();
            self.push_batch(batch);
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if self.batching {
            self.batch_description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batching
    }

    fn push_batch(&mut self, batch: SnapshotBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo future
        self.redo_stack.clear();
    }

    /// Snapshot to restore for undo, if any
    pub fn undo(&mut self) -> Option<Arc<Document>> {
        let batch = self.undo_stack.pop()?;
        let before = Arc::clone(&batch.before);
        self.redo_stack.push(batch);
        Some(before)
    }

    /// Snapshot to restore for redo, if any
    pub fn redo(&mut self) -> Option<Arc<Document>> {
        let batch = self.redo_stack.pop()?;
        let after = Arc::clone(&batch.after);
        self.undo_stack.push(batch);
        Some(after)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batching = false;
        self.current_batch = None;
        self.batch_description = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ednotes_blocks::Block;

    fn doc(text: &str) -> Arc<Document> {
        Arc::new(Document::from(vec![Block::paragraph(text)]))
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut history = History::new();
        let (a, b) = (doc("a"), doc("b"));
        history.record(a.clone(), b.clone(), "Update 0");

        assert_eq!(history.undo_description(), Some("Update 0"));
        assert_eq!(history.undo(), Some(a));
        assert_eq!(history.redo_levels(), 1);
        assert_eq!(history.redo_description(), Some("Update 0"));
        assert_eq!(history.redo(), Some(b));
        assert_eq!(history.undo(), Some(doc("a")));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_batched_commits() {
        let mut history = History::new();
        history.begin_batch();
        history.set_batch_description("Rewrite intro");
        history.record(doc("a"), doc("b"), "Update 0");
        history.record(doc("b"), doc("c"), "Update 0");
        history.end_batch();

        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_description(), Some("Rewrite intro"));
        assert_eq!(history.undo(), Some(doc("a")));
        assert_eq!(history.redo(), Some(doc("c")));
    }

    #[test]
    fn test_empty_batch_is_dropped() {
        let mut history = History::new();
        history.begin_batch();
        history.end_batch();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = History::new();
        history.record(doc("a"), doc("b"), "one");
        history.undo();
        assert_eq!(history.redo_levels(), 1);

        history.record(doc("a"), doc("c"), "two");
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::with_max_levels(2);
        for i in 0..3 {
            history.record(doc(&i.to_string()), doc(&(i + 1).to_string()), "step");
        }
        assert_eq!(history.undo_levels(), 2);
    }
}
