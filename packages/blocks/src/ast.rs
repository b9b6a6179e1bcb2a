//! Block document tree.
//!
//! A [`Document`] is an ordered sequence of [`Block`]s. `tabs` blocks carry
//! their own block sequences, so the tree nests without a depth limit.
//! Blocks have no identity on the wire: every address is positional
//! (see [`BlockPath`]).

use crate::path::BlockPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One node of the content tree, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Block {
    Header {
        level: u8,
        content: String,
    },

    /// Inline markup text (bold, italic, links).
    Paragraph {
        content: String,
    },

    Code {
        language: String,
        content: String,
    },

    Note {
        style: NoteStyle,
        content: String,
    },

    Figure {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        /// Inline text found on legacy payloads loaded with the open policy.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },

    /// TeX math expression.
    Equation {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    List {
        ordered: bool,
        items: Vec<String>,
    },

    /// Interactive demo resolved by name at render time.
    Demo {
        demo_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Map<String, Value>>,
    },

    /// Replaceable image bound to an entry of the resource map.
    ImageResource {
        id: String,
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },

    Tabs {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
        tabs: Vec<Tab>,
    },
}

/// A single tab of a `tabs` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub blocks: Vec<Block>,
}

impl Tab {
    pub fn new(value: impl Into<String>, label: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
            blocks,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Visual variant of a `note` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStyle {
    Info,
    Warning,
    Success,
    Error,
}

impl NoteStyle {
    pub const ALL: [NoteStyle; 4] = [
        NoteStyle::Info,
        NoteStyle::Warning,
        NoteStyle::Success,
        NoteStyle::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStyle::Info => "info",
            NoteStyle::Warning => "warning",
            NoteStyle::Success => "success",
            NoteStyle::Error => "error",
        }
    }
}

impl fmt::Display for NoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// The type tag of a block, without its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Header,
    Paragraph,
    Code,
    Note,
    Figure,
    Equation,
    List,
    Demo,
    ImageResource,
    Tabs,
}

impl BlockKind {
    pub const ALL: [BlockKind; 10] = [
        BlockKind::Header,
        BlockKind::Paragraph,
        BlockKind::Code,
        BlockKind::Note,
        BlockKind::Figure,
        BlockKind::Equation,
        BlockKind::List,
        BlockKind::Demo,
        BlockKind::ImageResource,
        BlockKind::Tabs,
    ];

    /// Wire name of the `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Code => "code",
            BlockKind::Note => "note",
            BlockKind::Figure => "figure",
            BlockKind::Equation => "equation",
            BlockKind::List => "list",
            BlockKind::Demo => "demo",
            BlockKind::ImageResource => "imageResource",
            BlockKind::Tabs => "tabs",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown block type: {0}")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Header { .. } => BlockKind::Header,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::Code { .. } => BlockKind::Code,
            Block::Note { .. } => BlockKind::Note,
            Block::Figure { .. } => BlockKind::Figure,
            Block::Equation { .. } => BlockKind::Equation,
            Block::List { .. } => BlockKind::List,
            Block::Demo { .. } => BlockKind::Demo,
            Block::ImageResource { .. } => BlockKind::ImageResource,
            Block::Tabs { .. } => BlockKind::Tabs,
        }
    }

    pub fn header(level: u8, content: impl Into<String>) -> Self {
        Block::Header {
            level,
            content: content.into(),
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Block::Paragraph {
            content: content.into(),
        }
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Block::Code {
            language: language.into(),
            content: content.into(),
        }
    }

    pub fn note(style: NoteStyle, content: impl Into<String>) -> Self {
        Block::Note {
            style,
            content: content.into(),
        }
    }

    pub fn demo(demo_type: impl Into<String>) -> Self {
        Block::Demo {
            demo_type: demo_type.into(),
            image_id: None,
            args: None,
        }
    }

    pub fn tabs(tabs: Vec<Tab>) -> Self {
        Block::Tabs {
            default_value: None,
            tabs,
        }
    }

    /// Nested tabs, if this is a `tabs` block.
    pub fn tab_list(&self) -> Option<&[Tab]> {
        match self {
            Block::Tabs { tabs, .. } => Some(tabs),
            _ => None,
        }
    }

    pub fn tab_list_mut(&mut self) -> Option<&mut Vec<Tab>> {
        match self {
            Block::Tabs { tabs, .. } => Some(tabs),
            _ => None,
        }
    }
}

/// Ordered top-level sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Resolve a block path (odd length). Returns `None` for anything that
    /// does not address an existing block.
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        let segments = path.segments();
        if !path.is_block() {
            return None;
        }

        let mut blocks: &[Block] = &self.blocks;
        let mut pairs = segments.chunks(2);
        loop {
            match pairs.next()? {
                [index] => return blocks.get(*index),
                [index, tab] => {
                    let tab = blocks.get(*index)?.tab_list()?.get(*tab)?;
                    blocks = &tab.blocks;
                }
                _ => return None,
            }
        }
    }

    /// Resolve a tab header path (even length).
    pub fn get_tab(&self, path: &BlockPath) -> Option<&Tab> {
        if !path.is_tab() {
            return None;
        }
        let (owner, index) = path.split_last()?;
        self.get(&owner)?.tab_list()?.get(index)
    }

    /// Total number of blocks, nested ones included.
    pub fn count_blocks(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|block| {
                    1 + block
                        .tab_list()
                        .map(|tabs| tabs.iter().map(|tab| count(&tab.blocks)).sum())
                        .unwrap_or(0)
                })
                .sum()
        }
        count(&self.blocks)
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

impl FromIterator<Block> for Document {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
