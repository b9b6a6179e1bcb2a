//! Flattened outline of a document, as shown in the block picker.
//!
//! Rebuild it after every mutation: the paths it carries are positional.

use ednotes_blocks::visitor::{walk_block, walk_tab, Visitor};
use ednotes_blocks::{Block, BlockKind, BlockPath, Document, Tab};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub path: BlockPath,
    /// Tab nesting depth (0 for top-level blocks)
    pub depth: usize,
    pub label: String,
    /// `None` for tab headers
    pub kind: Option<BlockKind>,
}

impl OutlineEntry {
    pub fn is_tab(&self) -> bool {
        self.kind.is_none()
    }

    /// Label indented two spaces per nesting level
    pub fn indented_label(&self) -> String {
        let indent = if self.is_tab() { self.depth + 1 } else { self.depth };
        format!("{}{}", "  ".repeat(indent), self.label)
    }
}

/// Depth-first flattening in document order; each tab header is followed
/// by its blocks.
pub fn outline(doc: &Document) -> Vec<OutlineEntry> {
    let mut builder = OutlineBuilder::default();
    builder.visit_document(doc);
    builder.entries
}

#[derive(Default)]
struct OutlineBuilder {
    entries: Vec<OutlineEntry>,
}

impl Visitor for OutlineBuilder {
    fn visit_block(&mut self, path: &BlockPath, block: &Block) {
        self.entries.push(OutlineEntry {
            path: path.clone(),
            depth: path.depth(),
            label: block_label(path, block),
            kind: Some(block.kind()),
        });
        walk_block(self, path, block);
    }

    fn visit_tab(&mut self, path: &BlockPath, tab: &Tab) {
        self.entries.push(OutlineEntry {
            path: path.clone(),
            depth: path.depth(),
            label: format!("↳ Tab: {}", tab.label),
            kind: None,
        });
        walk_tab(self, path, tab);
    }
}

fn block_label(path: &BlockPath, block: &Block) -> String {
    let detail = match block {
        Block::Header { level, .. } => Some(format!("h{}", level)),
        Block::Note { style, .. } => Some(style.to_string()),
        Block::Code { language, .. } => Some(language.clone()),
        Block::Tabs { tabs, .. } => Some(format!("{} tabs", tabs.len())),
        Block::Paragraph { .. }
        | Block::Figure { .. }
        | Block::Equation { .. }
        | Block::List { .. }
        | Block::Demo { .. }
        | Block::ImageResource { .. } => None,
    };

    match detail {
        Some(detail) => format!("{}: {} ({})", path, block.kind(), detail),
        None => format!("{}: {}", path, block.kind()),
    }
}
