use crate::validate::ValidationError;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Raw text could not be turned into a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid document: {0}")]
    Validation(#[from] ValidationError),
}

impl ParseError {
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn from_json(err: serde_json::Error) -> Self {
        let text = err.to_string();
        // serde_json appends the location; it is kept in separate fields
        let message = match text.rsplit_once(" at line ") {
            Some((message, _)) => message.to_string(),
            None => text,
        };
        Self::syntax(err.line(), err.column(), message)
    }

    /// One-based line and column of a syntax error.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax { line, column, .. } => Some((*line, *column)),
            ParseError::Validation(_) => None,
        }
    }

    /// Byte offset of a syntax error within `source`.
    pub fn offset(&self, source: &str) -> Option<usize> {
        let (line, column) = self.location()?;
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        Some((line_start + column.saturating_sub(1)).min(source.len()))
    }

    /// Character index of a syntax error within `source`; report spans
    /// count characters, not bytes.
    pub fn char_offset(&self, source: &str) -> Option<usize> {
        let offset = self.offset(source)?;
        Some(source.char_indices().take_while(|(i, _)| *i < offset).count())
    }
}

/// Pretty-print a parse error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_parse_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    let report = match error {
        ParseError::Syntax { message, .. } => {
            let start = error.char_offset(source).unwrap_or(0);
            let end = (start + 1).min(source.chars().count()).max(start);
            Report::build(ReportKind::Error, filename, start)
                .with_message(error.to_string())
                .with_label(
                    Label::new((filename, start..end))
                        .with_color(Color::Red)
                        .with_message(message.clone()),
                )
                .finish()
        }
        ParseError::Validation(validation) => Report::build(ReportKind::Error, filename, 0)
            .with_message(error.to_string())
            .with_note(format!("block path: {}", validation.path))
            .finish(),
    };

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Plain rendering when ariadne is not compiled in.
#[cfg(not(feature = "pretty-errors"))]
pub fn format_parse_error(_source: &str, filename: &str, error: &ParseError) -> String {
    format!("{}: {}", filename, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_line_and_column() {
        let source = "[\n  {\"type\": }\n]";
        let err = ParseError::syntax(2, 12, "expected value");
        assert_eq!(err.offset(source), Some(13));
        assert_eq!(&source[13..14], "}");
    }

    #[test]
    fn test_offset_is_clamped() {
        let err = ParseError::syntax(9, 9, "EOF while parsing");
        assert_eq!(err.offset("[{"), Some(2));
    }

    #[test]
    fn test_char_offset_counts_multibyte() {
        let source = "[\"\u{e9}\u{e9}\", }";
        let err = ParseError::syntax(1, 9, "expected value");
        assert_eq!(err.offset(source), Some(8));
        assert_eq!(err.char_offset(source), Some(6));
        assert_eq!(source.chars().nth(6), Some(' '));
    }
}
