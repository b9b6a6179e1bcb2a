//! Positional block addresses.
//!
//! Segments alternate between a block index and a tab index:
//!
//! ```text
//! [2]        block 2 of the document
//! [2, 0]     tab 0 of the tabs block at 2
//! [2, 0, 1]  block 1 inside that tab
//! [2, 0, 1, 3, 0]  ... and so on through nested tab groups
//! ```
//!
//! Odd lengths address blocks, even lengths address tab headers. Paths are
//! not stable across structural edits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// The empty path: the document itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Addresses a block (odd length).
    pub fn is_block(&self) -> bool {
        self.0.len() % 2 == 1
    }

    /// Addresses a tab header (even, non-zero length).
    pub fn is_tab(&self) -> bool {
        !self.0.is_empty() && self.0.len() % 2 == 0
    }

    /// Depth of tab nesting: 0 for top-level blocks.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1) / 2
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path extended by one segment.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        self.split_last().map(|(parent, _)| parent)
    }

    pub fn split_last(&self) -> Option<(Self, usize)> {
        let (last, rest) = self.0.split_last()?;
        Some((Self(rest.to_vec()), *last))
    }

    /// Same path with the final segment replaced.
    pub fn with_last(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        if let Some(last) = segments.last_mut() {
            *last = index;
        }
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &BlockPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid block path '{0}': expected dot-separated indices like 2.0.1")]
pub struct InvalidBlockPath(pub String);

impl FromStr for BlockPath {
    type Err = InvalidBlockPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidBlockPath(s.to_string()));
        }
        trimmed
            .split('.')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(BlockPath)
            .map_err(|_| InvalidBlockPath(s.to_string()))
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl From<&[usize]> for BlockPath {
    fn from(segments: &[usize]) -> Self {
        Self(segments.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for BlockPath {
    fn from(segments: [usize; N]) -> Self {
        Self(segments.to_vec())
    }
}
