//! # Block Tree
//!
//! Owner of the authoritative document.
//!
//! ## Lifecycle
//!
//! ```text
//! mutation → resolve target → engine → post-effects → commit
//!               (id → path)     (new value)             ↓
//!                                              document, version, ids
//! ```
//!
//! A commit is a single assignment of a new `Arc<Document>`. Read-only
//! passes (render, serialize) hold a snapshot and never observe a
//! half-applied edit.

use crate::ids::{BlockId, IdTree};
use crate::mutations::{Mutation, MutationError, MutationResult, Target};
use crate::post_effects::PostEffectEngine;
use ednotes_blocks::{BlockPath, Document};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct BlockTree {
    document: Arc<Document>,

    /// Current version number (increments on each commit)
    version: u64,

    ids: IdTree,
    effects: PostEffectEngine,
}

impl BlockTree {
    /// Empty document. `key` seeds block ids (file path, article id).
    pub fn new(key: &str) -> Self {
        Self::from_document(key, Document::new())
    }

    pub fn from_document(key: &str, document: Document) -> Self {
        Self {
            ids: IdTree::for_document(key, &document),
            document: Arc::new(document),
            version: 0,
            effects: PostEffectEngine::new(),
        }
    }

    pub fn with_effects(mut self, effects: PostEffectEngine) -> Self {
        self.effects = effects;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle on the current document for read-only passes
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn path_of(&self, id: &BlockId) -> Option<&BlockPath> {
        self.ids.path_of(id)
    }

    pub fn id_at(&self, path: &BlockPath) -> Option<&BlockId> {
        self.ids.id_at(path)
    }

    pub fn resolve(&self, target: &Target) -> Result<BlockPath, MutationError> {
        resolve_in(&self.ids, target)
    }

    /// Apply a mutation and its post-effects as one commit
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let mut ids = self.ids.clone();
        let mut current = Document::clone(&self.document);
        let mut applied = Vec::new();

        let mut pending = vec![mutation];
        let mut primary = true;
        while !pending.is_empty() {
            let mut secondary = Vec::new();
            for mutation in pending {
                let path = mutation.target().map(|t| resolve_in(&ids, t)).transpose()?;
                let next = mutation.apply_with(&current, |t| resolve_in(&ids, t))?;
                ids.record(&mutation, path.as_ref(), &next);

                let resolved = match path {
                    Some(path) => mutation.at_path(path),
                    None => mutation,
                };

                // Effects only react to the edit the caller asked for
                if primary {
                    secondary = self.effects.analyze(&resolved, &current, &next);
                    primary = false;
                }

                applied.push(resolved);
                current = next;
            }
            pending = secondary;
        }

        self.document = Arc::new(current);
        self.ids = ids;
        self.version += 1;

        debug!(
            op = applied[0].name(),
            secondary = applied.len() - 1,
            version = self.version,
            "applied mutation"
        );

        Ok(MutationResult {
            version: self.version,
            applied,
        })
    }

    /// Swap in a whole new document; ids are realigned by position.
    pub fn replace_document(&mut self, document: Document) {
        self.restore(Arc::new(document));
    }

    /// Reinstate a snapshot taken earlier (undo, redo).
    pub fn restore(&mut self, snapshot: Arc<Document>) {
        self.ids.realign(&snapshot);
        self.document = snapshot;
        self.version += 1;
        debug!(
            blocks = self.document.len(),
            version = self.version,
            "replaced document"
        );
    }
}

fn resolve_in(ids: &IdTree, target: &Target) -> Result<BlockPath, MutationError> {
    match target {
        Target::Path(path) => Ok(path.clone()),
        Target::Id(id) => ids
            .path_of(id)
            .cloned()
            .ok_or_else(|| MutationError::UnknownId(id.clone())),
    }
}
