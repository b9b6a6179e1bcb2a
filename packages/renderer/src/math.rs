//! Equation typesetting.

use crate::vdom::VNode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Empty equation")]
    Empty,

    #[error("Typesetting failed: {0}")]
    Failed(String),
}

pub trait MathTypesetter {
    fn typeset(&self, tex: &str) -> Result<VNode, MathError>;
}

/// Leaves the TeX source in place for client-side typesetting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexSource;

impl MathTypesetter for TexSource {
    fn typeset(&self, tex: &str) -> Result<VNode, MathError> {
        let tex = tex.trim();
        if tex.is_empty() {
            return Err(MathError::Empty);
        }
        Ok(VNode::element("span")
            .with_attr("class", "math math-display")
            .with_attr("data-tex", tex)
            .with_text(tex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex_source() {
        let node = TexSource.typeset(" a^2 + b^2 = c^2 ").unwrap();
        assert_eq!(node.attr("data-tex"), Some("a^2 + b^2 = c^2"));
        assert_eq!(node.attr("class"), Some("math math-display"));
        assert_eq!(TexSource.typeset("  "), Err(MathError::Empty));
    }
}
