//! # Path Mutation Engine
//!
//! Pure structural operations on block documents. Every operation takes the
//! current document by reference and returns a new value; the input is
//! never modified, so a failed operation leaves nothing to roll back.
//!
//! ## Addressing
//!
//! Paths alternate block and tab indices (see [`BlockPath`]):
//! - odd length addresses a block
//! - even length addresses a tab header
//!
//! Sibling indices shift on insert and delete. Re-derive paths after every
//! operation, or target blocks by id through [`crate::BlockTree`].

use crate::mutations::MutationError;
use ednotes_blocks::{validate_block, Block, BlockPath, Document, Tab, ValidationPolicy};
use serde_json::{Map, Value};
use thiserror::Error;

/// A path that does not resolve against the current document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty path")]
    Empty,

    #[error("Nothing at {0}")]
    NotFound(BlockPath),

    #[error("Block at {0} is not a tab group")]
    NotATabGroup(BlockPath),

    #[error("Path {0} addresses a tab header, expected a block")]
    ExpectedBlockPath(BlockPath),

    #[error("Path {0} addresses a block, expected a tab header")]
    ExpectedTabPath(BlockPath),
}

pub fn get<'a>(doc: &'a Document, path: &BlockPath) -> Option<&'a Block> {
    doc.get(path)
}

pub fn get_tab<'a>(doc: &'a Document, path: &BlockPath) -> Option<&'a Tab> {
    doc.get_tab(path)
}

/// Insert a top-level block. `None` appends.
pub fn insert_top(
    doc: &Document,
    block: Block,
    at: Option<usize>,
) -> Result<Document, MutationError> {
    let index = at.unwrap_or(doc.len());
    insert(doc, &BlockPath::from([index]), block)
}

/// Insert a block at any depth. The last index may equal the sibling count.
pub fn insert(doc: &Document, path: &BlockPath, block: Block) -> Result<Document, MutationError> {
    let (owner, index) = split_block_path(path)?;
    let mut next = doc.clone();

    let blocks = blocks_at_mut(&mut next, &owner)?;
    if index > blocks.len() {
        return Err(PathError::NotFound(path.clone()).into());
    }
    blocks.insert(index, block);

    Ok(next)
}

/// Insert a tab header into the tab group owning `path`.
pub fn insert_tab(doc: &Document, path: &BlockPath, tab: Tab) -> Result<Document, MutationError> {
    let (owner, index) = split_tab_path(path)?;
    let mut next = doc.clone();

    let tabs = tabs_at_mut(&mut next, &owner)?;
    if index > tabs.len() {
        return Err(PathError::NotFound(path.clone()).into());
    }
    tabs.insert(index, tab);

    Ok(next)
}

/// Remove the block (odd length) or tab header (even length) at `path`.
pub fn delete(doc: &Document, path: &BlockPath) -> Result<Document, MutationError> {
    if path.is_root() {
        return Err(PathError::Empty.into());
    }
    let mut next = doc.clone();

    if path.is_block() {
        let (owner, index) = split_block_path(path)?;
        let blocks = blocks_at_mut(&mut next, &owner)?;
        if index >= blocks.len() {
            return Err(PathError::NotFound(path.clone()).into());
        }
        blocks.remove(index);
    } else {
        let (owner, index) = split_tab_path(path)?;
        let tabs = tabs_at_mut(&mut next, &owner)?;
        if index >= tabs.len() {
            return Err(PathError::NotFound(path.clone()).into());
        }
        tabs.remove(index);
    }

    Ok(next)
}

/// Shallow-merge wire fields onto the block at `path`.
///
/// A `type` naming a different variant replaces the block with one built
/// from `fields` alone. A `null` value removes the field. The merged node is
/// validated on its own; the rest of the document is not re-checked.
pub fn update(
    doc: &Document,
    path: &BlockPath,
    fields: &Map<String, Value>,
) -> Result<Document, MutationError> {
    let mut next = doc.clone();
    let slot = block_at_mut(&mut next, path)?;

    let mut merged = wire_fields(slot);
    let changes_kind = fields
        .get("type")
        .is_some_and(|kind| merged.get("type") != Some(kind));
    if changes_kind {
        merged = fields.clone();
    } else {
        merged.extend(fields.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    merged.retain(|_, value| !value.is_null());

    *slot = validate_block(&Value::Object(merged), path, ValidationPolicy::Closed)?;

    Ok(next)
}

/// Replace the block at `path` wholesale.
pub fn replace(doc: &Document, path: &BlockPath, block: Block) -> Result<Document, MutationError> {
    let mut next = doc.clone();
    *block_at_mut(&mut next, path)? = block;
    Ok(next)
}

fn wire_fields(block: &Block) -> Map<String, Value> {
    match serde_json::to_value(block) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

fn split_block_path(path: &BlockPath) -> Result<(BlockPath, usize), PathError> {
    if path.is_root() {
        return Err(PathError::Empty);
    }
    if !path.is_block() {
        return Err(PathError::ExpectedBlockPath(path.clone()));
    }
    path.split_last().ok_or(PathError::Empty)
}

fn split_tab_path(path: &BlockPath) -> Result<(BlockPath, usize), PathError> {
    if path.is_root() {
        return Err(PathError::Empty);
    }
    if !path.is_tab() {
        return Err(PathError::ExpectedTabPath(path.clone()));
    }
    path.split_last().ok_or(PathError::Empty)
}

/// Block sequence owned by `owner`: the document for the root, otherwise the
/// tab addressed by the even-length `owner`.
fn blocks_at_mut<'a>(
    doc: &'a mut Document,
    owner: &BlockPath,
) -> Result<&'a mut Vec<Block>, PathError> {
    let segments = owner.segments();
    let mut blocks = &mut doc.blocks;

    for (step, pair) in segments.chunks(2).enumerate() {
        let &[index, tab] = pair else {
            return Err(PathError::ExpectedTabPath(owner.clone()));
        };
        let block_path = BlockPath::from(&segments[..step * 2 + 1]);

        let tabs = blocks
            .get_mut(index)
            .ok_or_else(|| PathError::NotFound(block_path.clone()))?
            .tab_list_mut()
            .ok_or_else(|| PathError::NotATabGroup(block_path))?;
        blocks = &mut tabs
            .get_mut(tab)
            .ok_or_else(|| PathError::NotFound(BlockPath::from(&segments[..step * 2 + 2])))?
            .blocks;
    }

    Ok(blocks)
}

fn block_at_mut<'a>(doc: &'a mut Document, path: &BlockPath) -> Result<&'a mut Block, PathError> {
    let (owner, index) = split_block_path(path)?;
    blocks_at_mut(doc, &owner)?
        .get_mut(index)
        .ok_or_else(|| PathError::NotFound(path.clone()))
}

fn tabs_at_mut<'a>(doc: &'a mut Document, owner: &BlockPath) -> Result<&'a mut Vec<Tab>, PathError> {
    block_at_mut(doc, owner)?
        .tab_list_mut()
        .ok_or_else(|| PathError::NotATabGroup(owner.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ednotes_blocks::NoteStyle;
    use serde_json::json;

    fn abc() -> Document {
        Document::from(vec![
            Block::paragraph("A"),
            Block::paragraph("B"),
            Block::paragraph("C"),
        ])
    }

    fn with_tabs() -> Document {
        Document::from(vec![
            Block::header(1, "Title"),
            Block::paragraph("Intro"),
            Block::Tabs {
                default_value: Some("first".to_string()),
                tabs: vec![
                    Tab::new("first", "First", vec![Block::paragraph("one"), Block::paragraph("two")]),
                    Tab::new("second", "Second", vec![]),
                ],
            },
        ])
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_append_then_get() {
        let doc = abc();
        let next = insert_top(&doc, Block::paragraph("D"), None).unwrap();
        assert_eq!(get(&next, &BlockPath::from([3])), Some(&Block::paragraph("D")));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_insert_top_at_index() {
        let next = insert_top(&abc(), Block::paragraph("X"), Some(0)).unwrap();
        assert_eq!(next.blocks[0], Block::paragraph("X"));
        assert_eq!(next.blocks[1], Block::paragraph("A"));

        let err = insert_top(&abc(), Block::paragraph("X"), Some(4)).unwrap_err();
        assert_eq!(err, MutationError::Path(PathError::NotFound(BlockPath::from([4]))));
    }

    #[test]
    fn test_delete_shifts_siblings() {
        let next = delete(&abc(), &BlockPath::from([1])).unwrap();
        assert_eq!(next.blocks, vec![Block::paragraph("A"), Block::paragraph("C")]);
        assert_eq!(get(&next, &BlockPath::from([1])), Some(&Block::paragraph("C")));
    }

    #[test]
    fn test_nested_tab_addressing() {
        let doc = with_tabs();
        assert_eq!(get(&doc, &BlockPath::from([2, 0, 0])), Some(&Block::paragraph("one")));

        let next = delete(&doc, &BlockPath::from([2, 0])).unwrap();
        let tabs = next.blocks[2].tab_list().unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].value, "second");
    }

    #[test]
    fn test_insert_into_tab() {
        let doc = with_tabs();
        let next = insert(&doc, &BlockPath::from([2, 1, 0]), Block::code("rust", "fn main() {}")).unwrap();
        assert_eq!(
            get(&next, &BlockPath::from([2, 1, 0])),
            Some(&Block::code("rust", "fn main() {}"))
        );

        let next = insert_tab(&next, &BlockPath::from([2, 2]), Tab::new("third", "Third", vec![])).unwrap();
        assert_eq!(get_tab(&next, &BlockPath::from([2, 2])).unwrap().label, "Third");
    }

    #[test]
    fn test_path_errors() {
        let doc = with_tabs();

        assert_eq!(
            delete(&doc, &BlockPath::root()).unwrap_err(),
            MutationError::Path(PathError::Empty)
        );
        assert_eq!(
            delete(&doc, &BlockPath::from([7])).unwrap_err(),
            MutationError::Path(PathError::NotFound(BlockPath::from([7])))
        );
        assert_eq!(
            insert(&doc, &BlockPath::from([0, 0, 0]), Block::paragraph("x")).unwrap_err(),
            MutationError::Path(PathError::NotATabGroup(BlockPath::from([0])))
        );
        assert_eq!(
            insert(&doc, &BlockPath::from([2, 5, 0]), Block::paragraph("x")).unwrap_err(),
            MutationError::Path(PathError::NotFound(BlockPath::from([2, 5])))
        );
        assert_eq!(
            replace(&doc, &BlockPath::from([2, 0]), Block::paragraph("x")).unwrap_err(),
            MutationError::Path(PathError::ExpectedBlockPath(BlockPath::from([2, 0])))
        );
        assert_eq!(
            insert_tab(&doc, &BlockPath::from([2]), Tab::new("x", "X", vec![])).unwrap_err(),
            MutationError::Path(PathError::ExpectedTabPath(BlockPath::from([2])))
        );
    }

    #[test]
    fn test_update_merges_fields() {
        let doc = with_tabs();
        let next = update(&doc, &BlockPath::from([0]), &fields(json!({"level": 3}))).unwrap();
        assert_eq!(next.blocks[0], Block::header(3, "Title"));
    }

    #[test]
    fn test_update_changing_type_replaces_node() {
        let doc = with_tabs();
        let next = update(
            &doc,
            &BlockPath::from([0]),
            &fields(json!({"type": "note", "style": "info", "content": "Heads up"})),
        )
        .unwrap();
        assert_eq!(next.blocks[0], Block::note(NoteStyle::Info, "Heads up"));

        // Old header fields are not carried over into the new variant
        let err = update(
            &doc,
            &BlockPath::from([0]),
            &fields(json!({"type": "paragraph"})),
        )
        .unwrap_err();
        assert!(matches!(err, MutationError::InvalidBlock(_)));
    }

    #[test]
    fn test_update_rejects_invalid_result() {
        let doc = with_tabs();
        let err = update(&doc, &BlockPath::from([0]), &fields(json!({"level": 9}))).unwrap_err();
        match err {
            MutationError::InvalidBlock(e) => assert_eq!(e.path, BlockPath::from([0])),
            other => panic!("expected invalid block, got {:?}", other),
        }
        assert_eq!(doc.blocks[0], Block::header(1, "Title"));
    }

    #[test]
    fn test_update_null_removes_optional_field() {
        let doc = Document::from(vec![Block::Figure {
            src: "a.png".to_string(),
            caption: Some("A".to_string()),
            content: None,
        }]);
        let next = update(&doc, &BlockPath::from([0]), &fields(json!({"caption": null}))).unwrap();
        assert_eq!(
            next.blocks[0],
            Block::Figure {
                src: "a.png".to_string(),
                caption: None,
                content: None,
            }
        );
    }

    #[test]
    fn test_replace_nested_block() {
        let doc = with_tabs();
        let next = replace(&doc, &BlockPath::from([2, 0, 1]), Block::paragraph("deux")).unwrap();
        assert_eq!(get(&next, &BlockPath::from([2, 0, 1])), Some(&Block::paragraph("deux")));
        assert_eq!(get(&doc, &BlockPath::from([2, 0, 1])), Some(&Block::paragraph("two")));
    }
}
