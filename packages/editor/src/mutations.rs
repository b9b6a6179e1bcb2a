//! # Block Mutations
//!
//! The command form of the path engine. A mutation names its target either
//! by position or by stable id; [`crate::BlockTree`] resolves ids to paths
//! at the moment of application.
//!
//! ## Mutation Semantics
//!
//! ### Insert / InsertTop / InsertTab
//! - The target is the position the new node will occupy
//! - Targeting by id inserts before the identified node
//!
//! ### Update
//! - Shallow merge of wire fields, last write wins
//! - A different `type` replaces the node (fields are not carried over)
//!
//! ### Delete
//! - Removes the node and everything nested in it

use crate::engine::{self, PathError};
use crate::ids::BlockId;
use ednotes_blocks::{Block, BlockPath, Document, Tab, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Where a mutation applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Path(BlockPath),
    Id(BlockId),
}

impl From<BlockPath> for Target {
    fn from(path: BlockPath) -> Self {
        Target::Path(path)
    }
}

impl From<BlockId> for Target {
    fn from(id: BlockId) -> Self {
        Target::Id(id)
    }
}

/// Structural edits on a block document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "op",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Mutation {
    /// Insert a top-level block; appends when `at` is absent
    InsertTop {
        block: Block,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<usize>,
    },

    /// Insert a block at any depth
    Insert { target: Target, block: Block },

    /// Insert a tab header into a tab group
    InsertTab { target: Target, tab: Tab },

    /// Remove a block or tab header
    Delete { target: Target },

    /// Shallow-merge wire fields onto a block
    Update {
        target: Target,
        fields: Map<String, Value>,
    },

    /// Replace a block wholesale
    Replace { target: Target, block: Block },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Invalid block: {0}")]
    InvalidBlock(#[from] ValidationError),

    #[error("No block or tab with id {0}")]
    UnknownId(BlockId),
}

impl Mutation {
    pub fn insert_top(block: Block) -> Self {
        Mutation::InsertTop { block, at: None }
    }

    pub fn insert(target: impl Into<Target>, block: Block) -> Self {
        Mutation::Insert {
            target: target.into(),
            block,
        }
    }

    pub fn insert_tab(target: impl Into<Target>, tab: Tab) -> Self {
        Mutation::InsertTab {
            target: target.into(),
            tab,
        }
    }

    pub fn delete(target: impl Into<Target>) -> Self {
        Mutation::Delete {
            target: target.into(),
        }
    }

    pub fn update(target: impl Into<Target>, fields: Map<String, Value>) -> Self {
        Mutation::Update {
            target: target.into(),
            fields,
        }
    }

    pub fn replace(target: impl Into<Target>, block: Block) -> Self {
        Mutation::Replace {
            target: target.into(),
            block,
        }
    }

    /// Short operation name used in logs and history descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertTop { .. } => "insertTop",
            Mutation::Insert { .. } => "insert",
            Mutation::InsertTab { .. } => "insertTab",
            Mutation::Delete { .. } => "delete",
            Mutation::Update { .. } => "update",
            Mutation::Replace { .. } => "replace",
        }
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            Mutation::InsertTop { .. } => None,
            Mutation::Insert { target, .. }
            | Mutation::InsertTab { target, .. }
            | Mutation::Delete { target }
            | Mutation::Update { target, .. }
            | Mutation::Replace { target, .. } => Some(target),
        }
    }

    /// Same mutation aimed at `path`. `InsertTop` has no target and is
    /// returned unchanged.
    pub fn at_path(&self, path: BlockPath) -> Mutation {
        let mut mutation = self.clone();
        match &mut mutation {
            Mutation::InsertTop { .. } => {}
            Mutation::Insert { target, .. }
            | Mutation::InsertTab { target, .. }
            | Mutation::Delete { target }
            | Mutation::Update { target, .. }
            | Mutation::Replace { target, .. } => *target = Target::Path(path),
        }
        mutation
    }

    /// Human readable summary, e.g. "Insert header at 2.0.1"
    pub fn describe(&self) -> String {
        let at = |target: &Target| match target {
            Target::Path(path) => path.to_string(),
            Target::Id(id) => format!("#{}", id),
        };
        match self {
            Mutation::InsertTop { block, at: None } => format!("Append {}", block.kind()),
            Mutation::InsertTop {
                block,
                at: Some(index),
            } => format!("Insert {} at {}", block.kind(), index),
            Mutation::Insert { target, block } => {
                format!("Insert {} at {}", block.kind(), at(target))
            }
            Mutation::InsertTab { target, tab } => {
                format!("Insert tab \"{}\" at {}", tab.label, at(target))
            }
            Mutation::Delete { target } => format!("Delete {}", at(target)),
            Mutation::Update { target, .. } => format!("Update {}", at(target)),
            Mutation::Replace { target, block } => {
                format!("Replace {} with {}", at(target), block.kind())
            }
        }
    }

    /// Apply to `doc` with path targets only. Id targets fail with
    /// [`MutationError::UnknownId`].
    pub fn apply(&self, doc: &Document) -> Result<Document, MutationError> {
        self.apply_with(doc, |target| match target {
            Target::Path(path) => Ok(path.clone()),
            Target::Id(id) => Err(MutationError::UnknownId(id.clone())),
        })
    }

    /// Apply to `doc`, resolving the target through `resolve`.
    pub fn apply_with<F>(&self, doc: &Document, resolve: F) -> Result<Document, MutationError>
    where
        F: Fn(&Target) -> Result<BlockPath, MutationError>,
    {
        match self {
            Mutation::InsertTop { block, at } => engine::insert_top(doc, block.clone(), *at),
            Mutation::Insert { target, block } => {
                engine::insert(doc, &resolve(target)?, block.clone())
            }
            Mutation::InsertTab { target, tab } => {
                engine::insert_tab(doc, &resolve(target)?, tab.clone())
            }
            Mutation::Delete { target } => engine::delete(doc, &resolve(target)?),
            Mutation::Update { target, fields } => engine::update(doc, &resolve(target)?, fields),
            Mutation::Replace { target, block } => {
                engine::replace(doc, &resolve(target)?, block.clone())
            }
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Primary mutation followed by post-effect mutations, targets resolved
    /// to the paths they were applied at
    pub applied: Vec<Mutation>,
}
