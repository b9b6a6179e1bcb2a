//! # Ednotes Editor
//!
//! Document editing engine for Ednotes block documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: raw text ⇄ Document                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Path engine (insert/delete/update)       │
//! │  - Stable ids for committed edits           │
//! │  - Post-effects, undo history               │
//! │  - Raw/structural view synchronization      │
//! │  - Image uploads into the resource map      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: snapshot + resources → HTML       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: raw text and HTML are views
//! 2. **Copy on write**: every commit is a new `Arc<Document>`
//! 3. **Nothing typed is lost**: invalid raw text is kept, never overwritten
//!    without being shelved
//!
//! ## Usage
//!
//! ```rust
//! use ednotes_blocks::{Block, BlockKind, BlockPath};
//! use ednotes_editor::{EditSession, Mutation};
//!
//! let mut session = EditSession::new("intro.json");
//! session.load(r#"[{"type": "header", "level": 1, "content": "Intro"}]"#).unwrap();
//!
//! session
//!     .apply(Mutation::insert_top(Block::template(BlockKind::Tabs)))
//!     .unwrap();
//! session
//!     .apply(Mutation::delete(BlockPath::from([1, 0])))
//!     .unwrap();
//!
//! assert!(session.raw().contains("\"tab-2\""));
//! assert!(session.undo());
//! ```

mod blob;
pub mod engine;
mod errors;
mod history;
mod ids;
mod mutations;
mod outline;
mod post_effects;
mod session;
mod store;
mod sync;
mod tree;

pub use blob::{BlobError, BlobRef, BlobStore, MemoryBlobStore};
pub use engine::PathError;
pub use errors::EditorError;
pub use history::{History, SnapshotBatch};
pub use ids::{BlockId, IdGenerator, IdTree};
pub use mutations::{Mutation, MutationError, MutationResult, Target};
pub use outline::{outline, OutlineEntry};
pub use post_effects::{PostEffect, PostEffectEngine, RetargetDefaultTab};
pub use session::EditSession;
pub use store::{Article, ArticleStore, MemoryArticleStore, NewArticle, StoreError};
pub use sync::{Authority, Diagnostic, SyncEvent, Synchronizer, ViewMode};
pub use tree::BlockTree;

// Re-export common types for convenience
pub use ednotes_blocks::{Block, BlockPath, Document, ImageResourceMap};
