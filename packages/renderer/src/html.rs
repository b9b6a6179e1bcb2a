//! HTML emission for rendered virtual DOM.

use crate::render::Rendered;
use crate::vdom::VNode;
use std::collections::BTreeMap;

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: String::new(),
        }
    }
}

struct Context<'o> {
    options: &'o HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'o> Context<'o> {
    fn new(options: &'o HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

impl Rendered {
    /// Body fragment for the rendered blocks
    pub fn to_html(&self, options: &HtmlOptions) -> String {
        let mut ctx = Context::new(options);
        for node in &self.nodes {
            write_node(node, &mut ctx);
        }
        ctx.get_output()
    }
}

/// Full page around the rendered blocks
pub fn render_page(rendered: &Rendered, title: &str, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line("<article class=\"ednotes\">");
    ctx.indent();
    for node in &rendered.nodes {
        write_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</article>");
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
        } => {
            let open = open_tag(tag, attributes);
            if is_void(tag) {
                ctx.add_line(&open);
            } else if children.is_empty() || holds_phrasing(tag) || !has_element_children(children) {
                let mut line = open;
                for child in children {
                    write_inline(child, &mut line);
                }
                line.push_str(&format!("</{}>", tag));
                ctx.add_line(&line);
            } else {
                ctx.add_line(&open);
                ctx.indent();
                for child in children {
                    write_node(child, ctx);
                }
                ctx.dedent();
                ctx.add_line(&format!("</{}>", tag));
            }
        }
        VNode::Text { content } => ctx.add_line(&escape_html(content)),
        VNode::Error { .. } => {
            let mut line = String::new();
            write_inline(node, &mut line);
            ctx.add_line(&line);
        }
    }
}

/// Single-line emission; whitespace inside inline content is significant.
fn write_inline(node: &VNode, out: &mut String) {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
        } => {
            out.push_str(&open_tag(tag, attributes));
            if is_void(tag) {
                return;
            }
            for child in children {
                write_inline(child, out);
            }
            out.push_str(&format!("</{}>", tag));
        }
        VNode::Text { content } => out.push_str(&escape_html(content)),
        VNode::Error { message } => {
            out.push_str("<div class=\"render-error\" role=\"alert\">");
            out.push_str(&escape_html(message));
            out.push_str("</div>");
        }
    }
}

fn open_tag(tag: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut open = format!("<{}", tag);
    for (name, value) in attributes {
        if value.is_empty() {
            open.push_str(&format!(" {}", name));
        } else {
            open.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
    }
    if is_void(tag) {
        open.push_str(" />");
    } else {
        open.push('>');
    }
    open
}

fn has_element_children(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, VNode::Element { .. } | VNode::Error { .. }))
}

/// Elements whose content is laid out as text
fn holds_phrasing(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "li"
            | "pre"
            | "code"
            | "a"
            | "em"
            | "strong"
            | "del"
            | "span"
            | "button"
            | "figcaption"
    )
}

pub fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
