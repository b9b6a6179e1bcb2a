//! Structural validation of untyped payloads.
//!
//! The validator is the only way from a parsed JSON value to a typed
//! [`Document`]. It reports the first mismatch in document order, with the
//! [`BlockPath`] of the offending block (or tab header) and the field name.

use crate::ast::{Block, Document, NoteStyle, Tab};
use crate::path::BlockPath;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// How unrecognized fields are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Wire contract: unknown fields are rejected.
    #[default]
    Closed,
    /// Legacy payloads: unknown fields are ignored, `figure.content` is kept
    /// and `demo.src` is read as `imageId`.
    Open,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    #[error("expected an array of blocks")]
    ExpectedArray,

    #[error("expected an object")]
    ExpectedObject,

    #[error("missing `type` tag")]
    MissingType,

    #[error("unknown block type `{0}`")]
    UnknownType(String),

    #[error("missing required field")]
    MissingField,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("heading level must be an integer from 1 to 6")]
    LevelOutOfRange,

    #[error("note style must be one of info, warning, success, error (found `{0}`)")]
    UnknownStyle(String),

    #[error("unrecognized field")]
    UnknownField,
}

/// First structural mismatch found in a candidate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Block (odd length) or tab header (even length) holding the mismatch.
    /// Empty when the document itself is malformed.
    pub path: BlockPath,
    pub field: Option<String>,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: BlockPath, field: Option<String>, reason: ValidationReason) -> Self {
        Self {
            path,
            field,
            reason,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str("document")?;
        } else if self.path.is_tab() {
            write!(f, "tab {}", self.path)?;
        } else {
            write!(f, "block {}", self.path)?;
        }
        if let Some(field) = &self.field {
            write!(f, ", field `{}`", field)?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a candidate document under the closed-shape policy.
pub fn validate(candidate: &Value) -> ValidationResult<Document> {
    validate_with(candidate, ValidationPolicy::Closed)
}

pub fn validate_with(candidate: &Value, policy: ValidationPolicy) -> ValidationResult<Document> {
    let validator = Validator { policy };
    let blocks = validator.sequence(candidate, &BlockPath::root(), None)?;
    Ok(Document::from(blocks))
}

/// Validate a single block value that will live at `path`.
pub fn validate_block(
    candidate: &Value,
    path: &BlockPath,
    policy: ValidationPolicy,
) -> ValidationResult<Block> {
    Validator { policy }.block(candidate, path)
}

struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    fn sequence(
        &self,
        value: &Value,
        owner: &BlockPath,
        field: Option<&str>,
    ) -> ValidationResult<Vec<Block>> {
        let items = value.as_array().ok_or_else(|| {
            ValidationError::new(
                owner.clone(),
                field.map(str::to_string),
                ValidationReason::ExpectedArray,
            )
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.block(item, &owner.child(index)))
            .collect()
    }

    fn block(&self, value: &Value, path: &BlockPath) -> ValidationResult<Block> {
        let obj = value.as_object().ok_or_else(|| {
            ValidationError::new(path.clone(), None, ValidationReason::ExpectedObject)
        })?;
        let fields = Fields {
            obj,
            path,
            policy: self.policy,
        };

        let tag = match obj.get("type") {
            None => return Err(fields.error(None, ValidationReason::MissingType)),
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => {
                return Err(fields.error(
                    Some("type"),
                    ValidationReason::WrongType {
                        expected: "a string",
                    },
                ))
            }
        };

        let block = match tag {
            "header" => {
                fields.closed(&["level", "content"])?;
                Block::Header {
                    level: fields.level()?,
                    content: fields.string("content")?,
                }
            }
            "paragraph" => {
                fields.closed(&["content"])?;
                Block::Paragraph {
                    content: fields.string("content")?,
                }
            }
            "code" => {
                fields.closed(&["language", "content"])?;
                Block::Code {
                    language: fields.string("language")?,
                    content: fields.string("content")?,
                }
            }
            "note" => {
                fields.closed(&["style", "content"])?;
                Block::Note {
                    style: fields.style()?,
                    content: fields.string("content")?,
                }
            }
            "figure" => {
                fields.closed(&["src", "caption"])?;
                Block::Figure {
                    src: fields.string("src")?,
                    caption: fields.optional_string("caption")?,
                    content: fields.legacy_string("content"),
                }
            }
            "equation" => {
                fields.closed(&["content", "caption"])?;
                Block::Equation {
                    content: fields.string("content")?,
                    caption: fields.optional_string("caption")?,
                }
            }
            "list" => {
                fields.closed(&["ordered", "items"])?;
                Block::List {
                    ordered: fields.boolean("ordered")?,
                    items: fields.string_list("items")?,
                }
            }
            "demo" => {
                fields.closed(&["demoType", "imageId", "args"])?;
                let image_id = match fields.optional_string("imageId")? {
                    Some(id) => Some(id),
                    None => fields.legacy_string("src"),
                };
                Block::Demo {
                    demo_type: fields.string("demoType")?,
                    image_id,
                    args: fields.optional_object("args")?,
                }
            }
            "imageResource" => {
                fields.closed(&["id", "src", "alt"])?;
                Block::ImageResource {
                    id: fields.string("id")?,
                    src: fields.string("src")?,
                    alt: fields.optional_string("alt")?,
                }
            }
            "tabs" => {
                fields.closed(&["defaultValue", "tabs"])?;
                let default_value = fields.optional_string("defaultValue")?;
                let raw_tabs = fields.required("tabs")?.as_array().ok_or_else(|| {
                    fields.error(
                        Some("tabs"),
                        ValidationReason::WrongType {
                            expected: "an array of tabs",
                        },
                    )
                })?;
                let tabs = raw_tabs
                    .iter()
                    .enumerate()
                    .map(|(index, tab)| self.tab(tab, &path.child(index)))
                    .collect::<ValidationResult<Vec<_>>>()?;
                Block::Tabs {
                    default_value,
                    tabs,
                }
            }
            other => {
                return Err(fields.error(
                    Some("type"),
                    ValidationReason::UnknownType(other.to_string()),
                ))
            }
        };

        Ok(block)
    }

    fn tab(&self, value: &Value, path: &BlockPath) -> ValidationResult<Tab> {
        let obj = value.as_object().ok_or_else(|| {
            ValidationError::new(path.clone(), None, ValidationReason::ExpectedObject)
        })?;
        let fields = Fields {
            obj,
            path,
            policy: self.policy,
        };

        fields.closed_exact(&["value", "label", "description", "blocks"])?;
        Ok(Tab {
            value: fields.string("value")?,
            label: fields.string("label")?,
            description: fields.optional_string("description")?,
            blocks: self.sequence(fields.required("blocks")?, path, Some("blocks"))?,
        })
    }
}

struct Fields<'a> {
    obj: &'a Map<String, Value>,
    path: &'a BlockPath,
    policy: ValidationPolicy,
}

impl<'a> Fields<'a> {
    fn error(&self, field: Option<&str>, reason: ValidationReason) -> ValidationError {
        ValidationError::new(self.path.clone(), field.map(str::to_string), reason)
    }

    /// Reject keys outside `allowed` (the `type` tag is always allowed).
    fn closed(&self, allowed: &[&str]) -> ValidationResult<()> {
        self.reject_unknown(|key| key == "type" || allowed.contains(&key))
    }

    fn closed_exact(&self, allowed: &[&str]) -> ValidationResult<()> {
        self.reject_unknown(|key| allowed.contains(&key))
    }

    fn reject_unknown(&self, known: impl Fn(&str) -> bool) -> ValidationResult<()> {
        if self.policy == ValidationPolicy::Open {
            return Ok(());
        }
        match self.obj.keys().find(|key| !known(key.as_str())) {
            Some(key) => Err(self.error(Some(key.as_str()), ValidationReason::UnknownField)),
            None => Ok(()),
        }
    }

    fn required(&self, name: &str) -> ValidationResult<&'a Value> {
        self.obj
            .get(name)
            .ok_or_else(|| self.error(Some(name), ValidationReason::MissingField))
    }

    fn string(&self, name: &str) -> ValidationResult<String> {
        match self.required(name)? {
            Value::String(value) => Ok(value.clone()),
            _ => Err(self.error(
                Some(name),
                ValidationReason::WrongType {
                    expected: "a string",
                },
            )),
        }
    }

    fn optional_string(&self, name: &str) -> ValidationResult<Option<String>> {
        match self.obj.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.error(
                Some(name),
                ValidationReason::WrongType {
                    expected: "a string",
                },
            )),
        }
    }

    /// Field honoured only under the open policy; wrong types are ignored.
    fn legacy_string(&self, name: &str) -> Option<String> {
        if self.policy != ValidationPolicy::Open {
            return None;
        }
        self.obj
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn boolean(&self, name: &str) -> ValidationResult<bool> {
        self.required(name)?.as_bool().ok_or_else(|| {
            self.error(
                Some(name),
                ValidationReason::WrongType {
                    expected: "a boolean",
                },
            )
        })
    }

    fn string_list(&self, name: &str) -> ValidationResult<Vec<String>> {
        let items = self.required(name)?.as_array().ok_or_else(|| {
            self.error(
                Some(name),
                ValidationReason::WrongType {
                    expected: "an array of strings",
                },
            )
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    self.error(
                        Some(format!("{}[{}]", name, index).as_str()),
                        ValidationReason::WrongType {
                            expected: "a string",
                        },
                    )
                })
            })
            .collect()
    }

    fn optional_object(&self, name: &str) -> ValidationResult<Option<Map<String, Value>>> {
        match self.obj.get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(_) => Err(self.error(
                Some(name),
                ValidationReason::WrongType {
                    expected: "an object",
                },
            )),
        }
    }

    fn level(&self) -> ValidationResult<u8> {
        let value = self.required("level")?;
        if !value.is_number() {
            return Err(self.error(
                Some("level"),
                ValidationReason::WrongType {
                    expected: "an integer",
                },
            ));
        }
        match value.as_u64() {
            Some(level @ 1..=6) => Ok(level as u8),
            _ => Err(self.error(Some("level"), ValidationReason::LevelOutOfRange)),
        }
    }

    fn style(&self) -> ValidationResult<NoteStyle> {
        match self.required("style")? {
            Value::String(style) => style
                .parse()
                .map_err(|found| self.error(Some("style"), ValidationReason::UnknownStyle(found))),
            _ => Err(self.error(
                Some("style"),
                ValidationReason::WrongType {
                    expected: "a string",
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_array_document() {
        let err = validate(&json!({"type": "paragraph"})).unwrap_err();
        assert!(err.path.is_root());
        assert_eq!(err.reason, ValidationReason::ExpectedArray);
    }

    #[test]
    fn test_rejects_unknown_field_on_header() {
        let candidate = json!([
            {"type": "paragraph", "content": "intro"},
            {"type": "header", "level": 2, "content": "Title", "color": "red"}
        ]);

        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.path, BlockPath::from([1]));
        assert_eq!(err.field.as_deref(), Some("color"));
        assert_eq!(err.reason, ValidationReason::UnknownField);
    }

    #[test]
    fn test_open_policy_ignores_unknown_fields() {
        let candidate = json!([
            {"type": "header", "level": 2, "content": "Title", "color": "red"}
        ]);

        let doc = validate_with(&candidate, ValidationPolicy::Open).unwrap();
        assert_eq!(doc.blocks, vec![Block::header(2, "Title")]);
    }

    #[test]
    fn test_level_bounds() {
        for level in [json!(0), json!(7), json!(2.5), json!(-1)] {
            let err = validate(&json!([{"type": "header", "level": level, "content": "x"}]))
                .unwrap_err();
            assert_eq!(err.reason, ValidationReason::LevelOutOfRange);
        }

        let err = validate(&json!([{"type": "header", "level": "2", "content": "x"}])).unwrap_err();
        assert!(matches!(err.reason, ValidationReason::WrongType { .. }));
    }

    #[test]
    fn test_note_style_literals() {
        let err = validate(&json!([{"type": "note", "style": "danger", "content": "x"}]))
            .unwrap_err();
        assert_eq!(err.reason, ValidationReason::UnknownStyle("danger".to_string()));
        assert_eq!(err.field.as_deref(), Some("style"));
    }

    #[test]
    fn test_list_items_must_be_strings() {
        let err = validate(&json!([{"type": "list", "ordered": true, "items": ["a", 2]}]))
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("items[1]"));
    }

    #[test]
    fn test_ordered_must_be_boolean() {
        let err = validate(&json!([{"type": "list", "ordered": "yes", "items": []}]))
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("ordered"));
    }

    #[test]
    fn test_unknown_type() {
        let err = validate(&json!([{"type": "video", "src": "x.mp4"}])).unwrap_err();
        assert_eq!(err.reason, ValidationReason::UnknownType("video".to_string()));
    }

    #[test]
    fn test_missing_field() {
        let err = validate(&json!([{"type": "code", "content": "x"}])).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("language"));
        assert_eq!(err.reason, ValidationReason::MissingField);
    }

    #[test]
    fn test_nested_tab_errors_carry_full_path() {
        let candidate = json!([
            {"type": "paragraph", "content": "a"},
            {"type": "tabs", "tabs": [
                {"value": "one", "label": "One", "blocks": []},
                {"value": "two", "label": "Two", "blocks": [
                    {"type": "paragraph", "content": "ok"},
                    {"type": "tabs", "tabs": [
                        {"value": "deep", "label": "Deep", "blocks": [
                            {"type": "note", "style": "info"}
                        ]}
                    ]}
                ]}
            ]}
        ]);

        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.path, BlockPath::from([1, 1, 1, 0, 0]));
        assert_eq!(err.field.as_deref(), Some("content"));
    }

    #[test]
    fn test_tab_header_errors() {
        let candidate = json!([
            {"type": "tabs", "tabs": [{"value": "a", "label": "A", "blocks": [], "icon": "x"}]}
        ]);
        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.path, BlockPath::from([0, 0]));
        assert_eq!(err.field.as_deref(), Some("icon"));
        assert!(err.to_string().starts_with("tab 0.0"));

        let candidate = json!([{"type": "tabs", "tabs": [{"value": "a", "label": "A", "blocks": {}}]}]);
        let err = validate(&candidate).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("blocks"));
        assert_eq!(err.reason, ValidationReason::ExpectedArray);
    }

    #[test]
    fn test_legacy_fields_under_open_policy() {
        let candidate = json!([
            {"type": "figure", "src": "a.png", "content": "draw this later"},
            {"type": "demo", "demoType": "imageSurface", "src": "shapes"}
        ]);

        assert!(validate(&candidate).is_err());

        let doc = validate_with(&candidate, ValidationPolicy::Open).unwrap();
        match &doc.blocks[0] {
            Block::Figure { content, .. } => assert_eq!(content.as_deref(), Some("draw this later")),
            other => panic!("expected figure, got {:?}", other),
        }
        match &doc.blocks[1] {
            Block::Demo { image_id, .. } => assert_eq!(image_id.as_deref(), Some("shapes")),
            other => panic!("expected demo, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new(
            BlockPath::from([3]),
            Some("level".to_string()),
            ValidationReason::LevelOutOfRange,
        );
        assert_eq!(
            err.to_string(),
            "block 3, field `level`: heading level must be an integer from 1 to 6"
        );
    }
}
