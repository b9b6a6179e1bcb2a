//! # Stable Block Ids
//!
//! Blocks carry no identity on the wire. The editor keeps a shadow tree of
//! opaque ids mirroring the document so that a committed edit can target a
//! node after its siblings have shifted.
//!
//! ```text
//! Document            IdTree
//! [0] header          9c1f03aa-1
//! [1] tabs            9c1f03aa-2
//!     [1.0] tab           9c1f03aa-3
//!         [1.0.0] para        9c1f03aa-4
//! ```
//!
//! Ids are never serialized with the document.

use crate::mutations::Mutation;
use crc32fast::Hasher;
use ednotes_blocks::{Block, BlockPath, Document, Tab};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque identity of a block or tab header within one editing session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Generate a document seed from a document key (path or article id) using CRC32
pub fn get_document_id(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for blocks within a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: get_document_id(key),
            count: 0,
        }
    }

    pub fn next_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[derive(Debug, Clone)]
struct IdNode {
    id: BlockId,
    tabs: Vec<IdTab>,
}

#[derive(Debug, Clone)]
struct IdTab {
    id: BlockId,
    blocks: Vec<IdNode>,
}

/// Shadow tree of ids plus the derived `id → path` index
#[derive(Debug, Clone)]
pub struct IdTree {
    generator: IdGenerator,
    blocks: Vec<IdNode>,
    index: HashMap<BlockId, BlockPath>,
}

impl IdTree {
    pub fn new(key: &str) -> Self {
        Self {
            generator: IdGenerator::new(key),
            blocks: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn for_document(key: &str, doc: &Document) -> Self {
        let mut tree = Self::new(key);
        tree.realign(doc);
        tree
    }

    /// Match the shadow tree to `doc` by position: existing ids stay where
    /// they are, new positions get fresh ids, vanished positions drop theirs.
    pub fn realign(&mut self, doc: &Document) {
        align_blocks(&mut self.generator, &mut self.blocks, &doc.blocks);
        self.reindex();
    }

    /// Mirror an applied mutation. `path` is the resolved target and `after`
    /// the document the mutation produced.
    pub fn record(&mut self, mutation: &Mutation, path: Option<&BlockPath>, after: &Document) {
        match (mutation, path) {
            (Mutation::InsertTop { at, .. }, _) => {
                let index = at.unwrap_or(self.blocks.len());
                let id = self.generator.next_id();
                if index <= self.blocks.len() {
                    self.blocks.insert(index, IdNode::leaf(id));
                }
            }
            (Mutation::Insert { .. }, Some(path)) => {
                if let Some((owner, index)) = path.split_last() {
                    let id = self.generator.next_id();
                    if let Some(nodes) = self.block_nodes_mut(&owner) {
                        if index <= nodes.len() {
                            nodes.insert(index, IdNode::leaf(id));
                        }
                    }
                }
            }
            (Mutation::InsertTab { .. }, Some(path)) => {
                if let Some((owner, index)) = path.split_last() {
                    let id = self.generator.next_id();
                    if let Some(tabs) = self.tab_nodes_mut(&owner) {
                        if index <= tabs.len() {
                            tabs.insert(index, IdTab::empty(id));
                        }
                    }
                }
            }
            (Mutation::Delete { .. }, Some(path)) => {
                if let Some((owner, index)) = path.split_last() {
                    if path.is_block() {
                        if let Some(nodes) = self.block_nodes_mut(&owner) {
                            if index < nodes.len() {
                                nodes.remove(index);
                            }
                        }
                    } else if let Some(tabs) = self.tab_nodes_mut(&owner) {
                        if index < tabs.len() {
                            tabs.remove(index);
                        }
                    }
                }
            }
            // Updates and replacements keep the node in place
            _ => {}
        }

        self.realign(after);
    }

    pub fn path_of(&self, id: &BlockId) -> Option<&BlockPath> {
        self.index.get(id)
    }

    /// Id of the block or tab header at `path`.
    pub fn id_at(&self, path: &BlockPath) -> Option<&BlockId> {
        let (owner, index) = path.split_last()?;
        if path.is_block() {
            self.block_nodes(&owner)?.get(index).map(|node| &node.id)
        } else {
            self.tab_nodes(&owner)?.get(index).map(|tab| &tab.id)
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn reindex(&mut self) {
        self.index.clear();
        index_blocks(&mut self.index, &BlockPath::root(), &self.blocks);
    }

    fn block_nodes(&self, owner: &BlockPath) -> Option<&Vec<IdNode>> {
        let mut nodes = &self.blocks;
        for pair in owner.segments().chunks(2) {
            let &[index, tab] = pair else { return None };
            nodes = &nodes.get(index)?.tabs.get(tab)?.blocks;
        }
        Some(nodes)
    }

    fn tab_nodes(&self, owner: &BlockPath) -> Option<&Vec<IdTab>> {
        let (parent, index) = owner.split_last()?;
        self.block_nodes(&parent)?.get(index).map(|node| &node.tabs)
    }

    fn block_nodes_mut(&mut self, owner: &BlockPath) -> Option<&mut Vec<IdNode>> {
        let mut nodes = &mut self.blocks;
        for pair in owner.segments().chunks(2) {
            let &[index, tab] = pair else { return None };
            nodes = &mut nodes.get_mut(index)?.tabs.get_mut(tab)?.blocks;
        }
        Some(nodes)
    }

    fn tab_nodes_mut(&mut self, owner: &BlockPath) -> Option<&mut Vec<IdTab>> {
        let (parent, index) = owner.split_last()?;
        self.block_nodes_mut(&parent)?
            .get_mut(index)
            .map(|node| &mut node.tabs)
    }
}

impl IdNode {
    fn leaf(id: BlockId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
        }
    }
}

impl IdTab {
    fn empty(id: BlockId) -> Self {
        Self {
            id,
            blocks: Vec::new(),
        }
    }
}

fn align_blocks(generator: &mut IdGenerator, nodes: &mut Vec<IdNode>, blocks: &[Block]) {
    nodes.truncate(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        if index == nodes.len() {
            nodes.push(IdNode::leaf(generator.next_id()));
        }
        align_node(generator, &mut nodes[index], block);
    }
}

fn align_node(generator: &mut IdGenerator, node: &mut IdNode, block: &Block) {
    match block {
        Block::Tabs { tabs, .. } => align_tabs(generator, &mut node.tabs, tabs),
        Block::Header { .. }
        | Block::Paragraph { .. }
        | Block::Code { .. }
        | Block::Note { .. }
        | Block::Figure { .. }
        | Block::Equation { .. }
        | Block::List { .. }
        | Block::Demo { .. }
        | Block::ImageResource { .. } => node.tabs.clear(),
    }
}

fn align_tabs(generator: &mut IdGenerator, nodes: &mut Vec<IdTab>, tabs: &[Tab]) {
    nodes.truncate(tabs.len());
    for (index, tab) in tabs.iter().enumerate() {
        if index == nodes.len() {
            nodes.push(IdTab::empty(generator.next_id()));
        }
        align_blocks(generator, &mut nodes[index].blocks, &tab.blocks);
    }
}

fn index_blocks(index: &mut HashMap<BlockId, BlockPath>, owner: &BlockPath, nodes: &[IdNode]) {
    for (position, node) in nodes.iter().enumerate() {
        let path = owner.child(position);
        for (tab_position, tab) in node.tabs.iter().enumerate() {
            let tab_path = path.child(tab_position);
            index_blocks(index, &tab_path, &tab.blocks);
            index.insert(tab.id.clone(), tab_path);
        }
        index.insert(node.id.clone(), path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("/articles/intro.json");
        let id2 = get_document_id("/articles/intro.json");
        assert_eq!(id1, id2);
        assert_ne!(id1, get_document_id("/articles/other.json"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("doc");
        let id1 = gen.next_id();
        let id2 = gen.next_id();
        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_every_node_gets_an_id() {
        let doc = Document::from(vec![
            Block::paragraph("a"),
            Block::tabs(vec![
                Tab::new("x", "X", vec![Block::paragraph("in x")]),
                Tab::new("y", "Y", vec![]),
            ]),
        ]);
        let ids = IdTree::for_document("doc", &doc);

        // 2 top-level blocks, 2 tabs, 1 nested block
        assert_eq!(ids.len(), 5);
        for path in [
            BlockPath::from([0]),
            BlockPath::from([1]),
            BlockPath::from([1, 0]),
            BlockPath::from([1, 0, 0]),
            BlockPath::from([1, 1]),
        ] {
            let id = ids.id_at(&path).unwrap();
            assert_eq!(ids.path_of(id), Some(&path));
        }
        assert!(ids.id_at(&BlockPath::from([1, 2])).is_none());
    }

    #[test]
    fn test_realign_keeps_ids_by_position() {
        let doc = Document::from(vec![Block::paragraph("a"), Block::paragraph("b")]);
        let mut ids = IdTree::for_document("doc", &doc);
        let first = ids.id_at(&BlockPath::from([0])).cloned().unwrap();

        let edited = Document::from(vec![Block::header(2, "a"), Block::paragraph("b"), Block::paragraph("c")]);
        ids.realign(&edited);

        assert_eq!(ids.id_at(&BlockPath::from([0])), Some(&first));
        assert_eq!(ids.len(), 3);
    }
}
