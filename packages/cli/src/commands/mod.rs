pub mod edit;
pub mod outline;
pub mod render;
pub mod validate;
pub mod watch;

pub use edit::{add, delete, AddArgs, DeleteArgs};
pub use outline::{outline, OutlineArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};
pub use watch::{watch, WatchArgs};

use anyhow::{anyhow, Result};
use ednotes_blocks::{format_parse_error, parse_with, Document, ParseError, ValidationPolicy};
use std::fs;
use std::path::Path;

/// Read and parse a document file, reporting parse errors with source context.
pub fn read_document(path: &Path, policy: ValidationPolicy) -> Result<(String, Document)> {
    let source = fs::read_to_string(path)
        .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
    let document = parse_with(&source, policy).map_err(|e| parse_failure(path, &source, &e))?;
    Ok((source, document))
}

pub fn parse_failure(path: &Path, source: &str, error: &ParseError) -> anyhow::Error {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    anyhow!("\n{}", format_parse_error(source, file_name, error))
}

/// `--open` selects the legacy-tolerant schema
pub fn policy(open: bool) -> ValidationPolicy {
    if open {
        ValidationPolicy::Open
    } else {
        ValidationPolicy::Closed
    }
}

/// `id=src` pair from the command line
pub fn parse_resource(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((id, src)) if !id.trim().is_empty() && !src.trim().is_empty() => {
            Ok((id.trim().to_string(), src.trim().to_string()))
        }
        _ => Err(format!("expected id=src, got '{}'", arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource() {
        assert_eq!(
            parse_resource("hero=/img/hero.png"),
            Ok(("hero".to_string(), "/img/hero.png".to_string()))
        );
        assert_eq!(
            parse_resource("a=data=x"),
            Ok(("a".to_string(), "data=x".to_string()))
        );
        assert!(parse_resource("hero").is_err());
        assert!(parse_resource("=x").is_err());
    }

    #[test]
    fn test_read_document_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.json");

        assert!(read_document(&path, ValidationPolicy::Closed).is_err());

        fs::write(&path, r#"[{"type": "header", "level": 1, "content": "x", "size": 3}]"#).unwrap();
        let err = read_document(&path, ValidationPolicy::Closed).unwrap_err();
        assert!(err.to_string().contains("size"));
    }
}
