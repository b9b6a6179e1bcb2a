//! Wire format: a JSON array of blocks.

use crate::ast::Document;
use crate::error::{ParseError, ParseResult};
use crate::validate::{validate_with, ValidationPolicy};
use serde_json::Value;
use tracing::debug;

/// Parse raw text under the closed-shape policy.
pub fn parse(source: &str) -> ParseResult<Document> {
    parse_with(source, ValidationPolicy::Closed)
}

pub fn parse_with(source: &str, policy: ValidationPolicy) -> ParseResult<Document> {
    let value: Value = serde_json::from_str(source).map_err(ParseError::from_json)?;
    let document = validate_with(&value, policy)?;
    debug!(blocks = document.len(), ?policy, "Parsed block document");
    Ok(document)
}

/// Serialize to pretty JSON with two-space indentation.
pub fn serialize(document: &Document) -> String {
    // Blocks hold only strings, integers, booleans and JSON values.
    serde_json::to_string_pretty(document).unwrap_or_default()
}

/// Compact single-line form, used for storage payloads.
pub fn serialize_compact(document: &Document) -> String {
    serde_json::to_string(document).unwrap_or_default()
}
