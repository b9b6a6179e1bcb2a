//! # Ednotes Blocks
//!
//! The content block model shared by the editor and the renderer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ raw text (JSON array of blocks)             │
//! └─────────────────────────────────────────────┘
//!                     ↓ parse / ↑ serialize
//! ┌─────────────────────────────────────────────┐
//! │ validate: untyped value → typed Document    │
//! │  - closed shapes, first mismatch reported   │
//! │  - paths into nested tab groups             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Document: Vec<Block>, tabs nest blocks      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use ednotes_blocks::{parse, serialize, BlockPath};
//!
//! let doc = parse(r#"[{"type": "header", "level": 1, "content": "Intro"}]"#).unwrap();
//! assert!(doc.get(&BlockPath::from([0])).is_some());
//! assert_eq!(parse(&serialize(&doc)).unwrap(), doc);
//! ```

pub mod ast;
pub mod codec;
pub mod error;
pub mod path;
pub mod resources;
pub mod templates;
pub mod validate;
pub mod visitor;


pub use ast::{Block, BlockKind, Document, NoteStyle, Tab, UnknownBlockKind};
pub use codec::{parse, parse_with, serialize, serialize_compact};
pub use error::{format_parse_error, ParseError, ParseResult};
pub use path::{BlockPath, InvalidBlockPath};
pub use resources::ImageResourceMap;
pub use validate::{
    validate, validate_block, validate_with, ValidationError, ValidationPolicy, ValidationReason,
    ValidationResult,
};
pub use visitor::Visitor;
