//! # Dual-View Synchronizer
//!
//! Keeps the raw JSON text and the structured block tree of one document in
//! step without silently discarding edits from either side.
//!
//! ## States
//!
//! ```text
//!               set_mode(Raw)
//!  Structural ───────────────→ Raw
//!      ↑                        │
//!      └────────────────────────┘
//!               set_mode(Structural)
//! ```
//!
//! - **Structural**: structural edits re-serialize the raw buffer at once
//! - **Raw**: structural edits only mark the buffer stale; typed text is
//!   parsed on every change and replaces the tree when it validates
//!
//! Raw text that does not parse is never dropped: a mode switch leaves it in
//! place, and a structural refresh that has to overwrite it shelves it first.

use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::tree::BlockTree;
use ednotes_blocks::{
    parse_with, serialize, BlockPath, Document, ParseError, ParseResult, ValidationPolicy,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which view the user is working in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Structural,
    Raw,
}

/// Which side produced the most recent valid document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Structural,
    Raw,
}

/// Best-effort location of a raw text problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub path: Option<BlockPath>,
}

impl From<&ParseError> for Diagnostic {
    fn from(error: &ParseError) -> Self {
        match error {
            ParseError::Syntax {
                line,
                column,
                message,
            } => Self {
                message: message.clone(),
                line: Some(*line),
                column: Some(*column),
                path: None,
            },
            ParseError::Validation(err) => Self {
                message: err.to_string(),
                line: None,
                column: None,
                path: Some(err.path.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Raw text validated and replaced the document
    DocumentReplaced { version: u64 },

    /// Raw text failed to parse or validate; the document is unchanged
    RawRejected(Diagnostic),

    /// The raw buffer was rewritten from the document
    RawRefreshed { version: u64 },

    /// Invalid raw text was moved aside by a refresh
    RawShelved,

    /// A raw edit replaced structural edits the stale buffer did not show
    StructuralSuperseded { snapshot: Arc<Document> },
}

#[derive(Debug)]
pub struct Synchronizer {
    tree: BlockTree,
    raw: String,
    mode: ViewMode,
    authority: Authority,

    /// Structural edits not yet written into `raw`
    raw_stale: bool,

    /// Set while `raw` holds text that does not parse
    diagnostic: Option<Diagnostic>,

    shelved: Option<String>,
    events: VecDeque<SyncEvent>,

    /// Schema strictness for raw text
    policy: ValidationPolicy,
}

impl Synchronizer {
    pub fn new(tree: BlockTree) -> Self {
        let raw = serialize(tree.document());
        Self {
            tree,
            raw,
            mode: ViewMode::Structural,
            authority: Authority::Structural,
            raw_stale: false,
            diagnostic: None,
            shelved: None,
            events: VecDeque::new(),
            policy: ValidationPolicy::Closed,
        }
    }

    /// Load a document from raw text. Invalid text is refused and nothing
    /// changes.
    pub fn load(&mut self, text: &str) -> ParseResult<()> {
        let document = parse_with(text, self.policy)?;
        info!(blocks = document.len(), "loaded document");
        self.tree.replace_document(document);
        self.raw = text.to_string();
        self.settle(Authority::Raw);
        self.shelved = None;
        self.events.push_back(SyncEvent::DocumentReplaced {
            version: self.tree.version(),
        });
        Ok(())
    }

    /// Open policy accepts legacy payloads in loads and raw edits.
    pub fn set_policy(&mut self, policy: ValidationPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Replace everything with `document`
    pub fn reset(&mut self, document: Document) {
        self.tree.replace_document(document);
        self.raw = serialize(self.tree.document());
        self.settle(Authority::Structural);
        self.shelved = None;
        self.events.push_back(SyncEvent::RawRefreshed {
            version: self.tree.version(),
        });
    }

    /// Structural edit
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        let result = self.tree.apply(mutation)?;
        self.structural_changed();
        Ok(result)
    }

    /// Reinstate a snapshot as a structural change (undo, redo)
    pub fn restore(&mut self, snapshot: Arc<Document>) {
        self.tree.restore(snapshot);
        self.structural_changed();
    }

    /// Raw edit. The buffer always takes `text`; the document follows only
    /// when the text validates.
    pub fn edit_raw(&mut self, text: impl Into<String>) {
        self.raw = text.into();

        match parse_with(&self.raw, self.policy) {
            Ok(document) => {
                if self.raw_stale {
                    warn!("raw edit replaced structural edits made while the raw view was stale");
                    self.events.push_back(SyncEvent::StructuralSuperseded {
                        snapshot: self.tree.snapshot(),
                    });
                }
                self.tree.replace_document(document);
                self.settle(Authority::Raw);
                debug!(version = self.tree.version(), "raw edit accepted");
                self.events.push_back(SyncEvent::DocumentReplaced {
                    version: self.tree.version(),
                });
            }
            Err(error) => {
                let diagnostic = Diagnostic::from(&error);
                warn!(
                    line = ?diagnostic.line,
                    column = ?diagnostic.column,
                    "raw edit rejected: {}",
                    diagnostic.message
                );
                self.diagnostic = Some(diagnostic.clone());
                self.events.push_back(SyncEvent::RawRejected(diagnostic));
            }
        }
    }

    /// Switch views, reconciling the raw buffer once.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode == mode {
            return;
        }
        debug!(from = ?self.mode, to = ?mode, "switching view");
        self.mode = mode;

        // Invalid raw text authored by the user stays where it is
        if self.authority == Authority::Structural && self.raw_stale && self.diagnostic.is_none() {
            self.refresh_raw();
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_raw_stale(&self) -> bool {
        self.raw_stale
    }

    /// Problem with the current raw text, if it does not validate
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    /// Invalid raw text displaced by the last refresh
    pub fn shelved_raw(&self) -> Option<&str> {
        self.shelved.as_deref()
    }

    pub fn take_shelved_raw(&mut self) -> Option<String> {
        self.shelved.take()
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn document(&self) -> &Document {
        self.tree.document()
    }

    pub fn snapshot(&self) -> Arc<Document> {
        self.tree.snapshot()
    }

    pub fn version(&self) -> u64 {
        self.tree.version()
    }

    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.events.drain(..).collect()
    }

    fn structural_changed(&mut self) {
        self.authority = Authority::Structural;
        match self.mode {
            ViewMode::Structural => self.refresh_raw(),
            ViewMode::Raw => self.raw_stale = true,
        }
    }

    fn refresh_raw(&mut self) {
        if self.diagnostic.take().is_some() {
            self.shelved = Some(std::mem::take(&mut self.raw));
            self.events.push_back(SyncEvent::RawShelved);
        }
        self.raw = serialize(self.tree.document());
        self.raw_stale = false;
        self.events.push_back(SyncEvent::RawRefreshed {
            version: self.tree.version(),
        });
    }

    fn settle(&mut self, authority: Authority) {
        self.authority = authority;
        self.raw_stale = false;
        self.diagnostic = None;
    }
}
