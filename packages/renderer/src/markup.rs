//! Inline markup for paragraph and list text.
//!
//! Text is read as markdown but only inline constructs survive: emphasis,
//! strong, strikethrough, inline code, links and line breaks. Headings,
//! lists, quotes, code blocks and tables collapse into plain paragraphs
//! carrying their text. Raw HTML is kept as text and escaped on output.

use crate::vdom::VNode;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// One `<p>` per markdown block.
pub fn paragraphs(source: &str) -> Vec<VNode> {
    let mut builder = InlineBuilder::default();
    builder.process(Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH));
    builder.finish()
}

/// Inline nodes without paragraph wrappers; blocks are joined by `<br>`.
pub fn inline(source: &str) -> Vec<VNode> {
    let mut nodes = Vec::new();
    for (index, paragraph) in paragraphs(source).into_iter().enumerate() {
        if index > 0 {
            nodes.push(VNode::element("br"));
        }
        if let VNode::Element { children, .. } = paragraph {
            nodes.extend(children);
        }
    }
    nodes
}

#[derive(Default)]
struct InlineBuilder {
    /// Open elements; the bottom one is the current `<p>`.
    stack: Vec<VNode>,
    paragraphs: Vec<VNode>,
}

impl InlineBuilder {
    fn process<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.push(VNode::text(&*text)),
                Event::Code(code) => self.push(VNode::element("code").with_text(&*code)),
                Event::Html(html) | Event::InlineHtml(html) => self.push(VNode::text(&*html)),
                Event::SoftBreak => self.push(VNode::text("\n")),
                Event::HardBreak => self.push(VNode::element("br")),
                Event::InlineMath(tex) | Event::DisplayMath(tex) => {
                    self.push(VNode::text(&*tex))
                }
                Event::TaskListMarker(checked) => {
                    self.push(VNode::text(if checked { "[x] " } else { "[ ] " }))
                }
                Event::FootnoteReference(label) => {
                    self.push(VNode::text(format!("[^{}]", label)))
                }
                Event::Rule => self.close_paragraph(),
            }
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Emphasis => self.open("em"),
            Tag::Strong => self.open("strong"),
            Tag::Strikethrough => self.open("del"),
            Tag::Link { dest_url, .. } => {
                self.ensure_paragraph();
                let link = if is_safe_url(&dest_url) {
                    VNode::element("a").with_attr("href", dest_url.to_string())
                } else {
                    VNode::element("span")
                };
                self.stack.push(link);
            }
            Tag::Item => self.close_paragraph(),
            // Everything else only contributes its text
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.close_inline()
            }
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::Item
            | TagEnd::TableRow
            | TagEnd::TableHead => self.close_paragraph(),
            _ => {}
        }
    }

    fn ensure_paragraph(&mut self) {
        if self.stack.is_empty() {
            self.stack.push(VNode::element("p"));
        }
    }

    fn open(&mut self, tag: &str) {
        self.ensure_paragraph();
        self.stack.push(VNode::element(tag));
    }

    fn push(&mut self, node: VNode) {
        self.ensure_paragraph();
        if let Some(top) = self.stack.pop() {
            self.stack.push(top.with_child(node));
        }
    }

    fn close_inline(&mut self) {
        if self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self.push(node);
            }
        }
    }

    fn close_paragraph(&mut self) {
        while self.stack.len() > 1 {
            self.close_inline();
        }
        if let Some(paragraph) = self.stack.pop() {
            if !paragraph.children().is_empty() {
                self.paragraphs.push(paragraph);
            }
        }
    }

    fn finish(mut self) -> Vec<VNode> {
        self.close_paragraph();
        self.paragraphs
    }
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:"))
}
