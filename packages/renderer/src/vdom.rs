use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element. Attributes are kept sorted so output is deterministic.
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },

    /// Error node (a block that failed to render, shown in its own slot)
    Error { message: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        VNode::Error {
            message: message.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Boolean attribute (`inert`, `hidden`)
    pub fn with_flag(self, key: impl Into<String>) -> Self {
        self.with_attr(key, "")
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(VNode::text(content))
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text { .. } | VNode::Error { .. } => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            VNode::Text { .. } | VNode::Error { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } | VNode::Error { .. } => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VNode::Error { .. })
    }

    /// Concatenated text content, depth first
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Text { content } => out.push_str(content),
            VNode::Error { message } => out.push_str(message),
        }
    }

    /// First descendant (self included) matching `predicate`, depth first
    pub fn find(&self, predicate: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_queries() {
        let node = VNode::element("div")
            .with_attr("class", "note")
            .with_child(VNode::element("strong").with_text("Hi"))
            .with_text(" there");

        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.attr("class"), Some("note"));
        assert_eq!(node.text_content(), "Hi there");
        assert!(node.find(&|n| n.tag() == Some("strong")).is_some());
    }

    #[test]
    fn test_builders_ignore_non_elements() {
        let text = VNode::text("plain").with_attr("class", "x").with_text("y");
        assert_eq!(text, VNode::text("plain"));
        assert!(text.children().is_empty());
    }
}
