//! Runtime image resource map.
//!
//! Maps an image-resource id to its current source reference (URL or blob
//! reference). Built from the `imageResource` blocks of a document at load
//! time and updated by replace operations; never serialized with the
//! document.

use crate::ast::{Block, Document};
use crate::path::BlockPath;
use crate::visitor::{walk_block, Visitor};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageResourceMap {
    entries: IndexMap<String, String>,
}

impl ImageResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `imageResource` block in document order, nested tabs
    /// included. The first block declaring an id wins.
    pub fn from_document(doc: &Document) -> Self {
        struct Collect(ImageResourceMap);

        impl Visitor for Collect {
            fn visit_block(&mut self, path: &BlockPath, block: &Block) {
                if let Block::ImageResource { id, src, .. } = block {
                    self.0
                        .entries
                        .entry(id.clone())
                        .or_insert_with(|| src.clone());
                }
                walk_block(self, path, block);
            }
        }

        let mut collect = Collect(Self::new());
        collect.visit_document(doc);
        collect.0
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Point `id` at a new source, returning the previous one. Unknown ids
    /// are appended.
    pub fn replace(&mut self, id: impl Into<String>, src: impl Into<String>) -> Option<String> {
        self.entries.insert(id.into(), src.into())
    }

    /// First resource in insertion order.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries
            .first()
            .map(|(id, src)| (id.as_str(), src.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, src)| (id.as_str(), src.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImageResourceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, src)| (id.into(), src.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Tab;

    fn image(id: &str, src: &str) -> Block {
        Block::ImageResource {
            id: id.to_string(),
            src: src.to_string(),
            alt: None,
        }
    }

    #[test]
    fn test_collects_nested_resources_in_order() {
        let doc = Document::from(vec![
            image("hero", "/img/hero.png"),
            Block::tabs(vec![Tab::new("a", "A", vec![image("shapes", "/img/shapes.jpg")])]),
            image("hero", "/img/other.png"),
        ]);

        let map = ImageResourceMap::from_document(&doc);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("hero"), Some("/img/hero.png"));
        assert_eq!(map.get("shapes"), Some("/img/shapes.jpg"));
        assert_eq!(map.first(), Some(("hero", "/img/hero.png")));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map: ImageResourceMap = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(map.replace("a", "blob:ednotes/1"), Some("1".to_string()));
        assert_eq!(map.first(), Some(("a", "blob:ednotes/1")));
        assert_eq!(map.replace("c", "3"), None);
        assert_eq!(map.len(), 3);
    }
}
