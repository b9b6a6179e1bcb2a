//! Comprehensive mutation tests

use ednotes_blocks::{parse, Block, BlockPath, Document, NoteStyle, Tab};
use ednotes_editor::engine::{delete, get, insert, insert_top, update};
use ednotes_editor::{BlockTree, Mutation, MutationError, PathError};
use serde_json::json;

fn article() -> Document {
    parse(
        r#"[
          {"type": "header", "level": 1, "content": "Sorting"},
          {"type": "paragraph", "content": "Compare and swap."},
          {
            "type": "tabs",
            "defaultValue": "bubble",
            "tabs": [
              {"value": "bubble", "label": "Bubble", "blocks": [
                {"type": "demo", "demoType": "bubbleSort"},
                {"type": "code", "language": "python", "content": "swap(a, b)"}
              ]},
              {"value": "merge", "label": "Merge", "blocks": []}
            ]
          }
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_append_then_resolve() {
    let doc = article();
    let n = doc.len();
    let next = insert_top(&doc, Block::paragraph("Outro"), None).unwrap();
    assert_eq!(get(&next, &BlockPath::from([n])), Some(&Block::paragraph("Outro")));
}

#[test]
fn test_delete_shifts_paths() {
    let doc = Document::from(vec![
        Block::paragraph("A"),
        Block::paragraph("B"),
        Block::paragraph("C"),
    ]);
    let next = delete(&doc, &BlockPath::from([1])).unwrap();
    assert_eq!(next.blocks, vec![Block::paragraph("A"), Block::paragraph("C")]);
    assert_eq!(get(&next, &BlockPath::from([1])), Some(&Block::paragraph("C")));
}

#[test]
fn test_nested_tab_addressing() {
    let doc = article();
    assert_eq!(get(&doc, &BlockPath::from([2, 0, 0])), Some(&Block::demo("bubbleSort")));

    let next = delete(&doc, &BlockPath::from([2, 0])).unwrap();
    assert_eq!(next.blocks[2].tab_list().map(|tabs| tabs.len()), Some(1));
}

#[test]
fn test_insert_at_depth_two() {
    let doc = article();
    let nested = Block::tabs(vec![Tab::new("inner", "Inner", vec![])]);
    let doc = insert(&doc, &BlockPath::from([2, 1, 0]), nested).unwrap();
    let doc = insert(
        &doc,
        &BlockPath::from([2, 1, 0, 0, 0]),
        Block::note(NoteStyle::Success, "deep"),
    )
    .unwrap();

    assert_eq!(
        get(&doc, &BlockPath::from([2, 1, 0, 0, 0])),
        Some(&Block::note(NoteStyle::Success, "deep"))
    );
}

#[test]
fn test_update_via_wire_fields() {
    let doc = article();
    let fields = json!({"language": "rust", "content": "a.swap(i, j);"});
    let next = update(
        &doc,
        &BlockPath::from([2, 0, 1]),
        fields.as_object().unwrap(),
    )
    .unwrap();
    assert_eq!(
        get(&next, &BlockPath::from([2, 0, 1])),
        Some(&Block::code("rust", "a.swap(i, j);"))
    );
}

#[test]
fn test_update_rejects_unknown_field() {
    let doc = article();
    let fields = json!({"color": "red"});
    let err = update(&doc, &BlockPath::from([0]), fields.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, MutationError::InvalidBlock(_)));
}

#[test]
fn test_failed_mutation_keeps_tree() {
    let mut tree = BlockTree::from_document("sorting", article());
    let before = tree.snapshot();

    let err = tree
        .apply(Mutation::insert(BlockPath::from([1, 0, 0]), Block::paragraph("x")))
        .unwrap_err();
    assert_eq!(err, MutationError::Path(PathError::NotATabGroup(BlockPath::from([1]))));
    assert_eq!(*tree.document(), *before);
    assert_eq!(tree.version(), 0);
}
