use crate::ast::{Block, Document, Tab};
use crate::path::BlockPath;

/// Visitor pattern for traversing block documents immutably
///
/// Default implementations walk the entire tree in document order, passing
/// the positional path of every block and tab header. Override specific
/// visit_* methods to act on nodes; call the matching walk_* function to
/// keep descending.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, path: &BlockPath, block: &Block) {
        walk_block(self, path, block);
    }

    fn visit_tab(&mut self, path: &BlockPath, tab: &Tab) {
        walk_tab(self, path, tab);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    walk_blocks(visitor, &BlockPath::root(), &doc.blocks);
}

pub fn walk_blocks<V: Visitor>(visitor: &mut V, owner: &BlockPath, blocks: &[Block]) {
    for (index, block) in blocks.iter().enumerate() {
        visitor.visit_block(&owner.child(index), block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, path: &BlockPath, block: &Block) {
    match block {
        Block::Tabs { tabs, .. } => {
            for (index, tab) in tabs.iter().enumerate() {
                visitor.visit_tab(&path.child(index), tab);
            }
        }
        Block::Header { .. }
        | Block::Paragraph { .. }
        | Block::Code { .. }
        | Block::Note { .. }
        | Block::Figure { .. }
        | Block::Equation { .. }
        | Block::List { .. }
        | Block::Demo { .. }
        | Block::ImageResource { .. } => {
            // Leaf block, no children to walk
        }
    }
}

pub fn walk_tab<V: Visitor>(visitor: &mut V, path: &BlockPath, tab: &Tab) {
    walk_blocks(visitor, path, &tab.blocks);
}
