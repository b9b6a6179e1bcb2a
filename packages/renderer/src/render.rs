//! Block dispatch: `Document` + resources → virtual DOM.
//!
//! Every block renders into its own slot. A block that cannot render leaves
//! an error node in that slot and a [`RenderFallback`] in the result; its
//! siblings are unaffected.

use crate::demos::{DemoError, DemoProps, DemoProvider};
use crate::markup;
use crate::math::{MathError, MathTypesetter, TexSource};
use crate::vdom::VNode;
use ednotes_blocks::{Block, BlockPath, Document, ImageResourceMap, NoteStyle, Tab};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Demo not found: {0}")]
    UnknownDemo(String),

    #[error("Demo '{name}' failed: {source}")]
    Demo {
        name: String,
        #[source]
        source: DemoError,
    },

    #[error("Equation failed: {0}")]
    Math(#[from] MathError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFallback {
    pub path: BlockPath,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub nodes: Vec<VNode>,
    pub fallbacks: Vec<RenderFallback>,
}

impl Rendered {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Emit editing affordances (image replacement, block paths)
    pub editable: bool,
}

pub struct Renderer<'a> {
    demos: &'a dyn DemoProvider,
    math: Box<dyn MathTypesetter + 'a>,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(demos: &'a dyn DemoProvider) -> Self {
        Self {
            demos,
            math: Box::new(TexSource),
            options: RenderOptions::default(),
        }
    }

    pub fn with_math(mut self, math: impl MathTypesetter + 'a) -> Self {
        self.math = Box::new(math);
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn editable(self) -> Self {
        self.with_options(RenderOptions { editable: true })
    }

    pub fn render(&self, doc: &Document, resources: &ImageResourceMap) -> Rendered {
        let mut pass = RenderPass {
            renderer: self,
            resources,
            fallbacks: Vec::new(),
        };
        let nodes = pass.blocks(&BlockPath::root(), &doc.blocks);

        info!(
            blocks = doc.count_blocks(),
            fallbacks = pass.fallbacks.len(),
            "rendered document"
        );
        Rendered {
            nodes,
            fallbacks: pass.fallbacks,
        }
    }
}

struct RenderPass<'r, 'a> {
    renderer: &'r Renderer<'a>,
    resources: &'r ImageResourceMap,
    fallbacks: Vec<RenderFallback>,
}

impl RenderPass<'_, '_> {
    fn blocks(&mut self, owner: &BlockPath, blocks: &[Block]) -> Vec<VNode> {
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| self.slot(&owner.child(index), block))
            .collect()
    }

    fn slot(&mut self, path: &BlockPath, block: &Block) -> VNode {
        let node = match self.block(path, block) {
            Ok(node) => node,
            Err(error) => {
                let reason = error.to_string();
                warn!(%path, kind = %block.kind(), %reason, "block rendered as fallback");
                self.fallbacks.push(RenderFallback {
                    path: path.clone(),
                    reason: reason.clone(),
                });
                return VNode::error(reason);
            }
        };

        if self.renderer.options.editable {
            node.with_attr("data-block-path", path.to_string())
        } else {
            node
        }
    }

    fn block(&mut self, path: &BlockPath, block: &Block) -> Result<VNode, RenderError> {
        match block {
            Block::Header { level, content } => {
                let level = (*level).clamp(1, 6);
                Ok(VNode::element(format!("h{}", level)).with_text(content.as_str()))
            }

            Block::Paragraph { content } => Ok(VNode::element("div")
                .with_attr("class", "paragraph")
                .with_children(markup::paragraphs(content))),

            Block::Code { language, content } => {
                let code = VNode::element("code")
                    .with_attr("class", format!("language-{}", language))
                    .with_text(content.as_str());
                Ok(VNode::element("pre").with_child(code))
            }

            Block::Note { style, content } => Ok(note(*style, content)),

            Block::Figure {
                src,
                caption,
                content,
            } => Ok(self.figure(path, src, caption.as_deref(), content.as_deref())),

            Block::Equation { content, caption } => {
                let math = self.renderer.math.typeset(content)?;
                let mut equation = VNode::element("div")
                    .with_attr("class", "equation")
                    .with_child(math);
                if let Some(caption) = caption {
                    equation = equation.with_child(
                        VNode::element("div")
                            .with_attr("class", "equation-caption")
                            .with_text(caption.as_str()),
                    );
                }
                Ok(equation)
            }

            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                Ok(VNode::element(tag).with_children(
                    items
                        .iter()
                        .map(|item| VNode::element("li").with_children(markup::inline(item)))
                        .collect(),
                ))
            }

            Block::Demo {
                demo_type,
                image_id,
                args,
            } => self.demo(demo_type, image_id.as_deref(), args.as_ref()),

            Block::ImageResource { id, src, alt } => Ok(self.image_resource(id, src, alt.as_deref())),

            Block::Tabs {
                default_value,
                tabs,
            } => Ok(self.tabs(path, default_value.as_deref(), tabs)),
        }
    }

    fn figure(
        &mut self,
        path: &BlockPath,
        src: &str,
        caption: Option<&str>,
        legacy: Option<&str>,
    ) -> VNode {
        if let Some(legacy) = legacy {
            debug!(%path, "figure carries legacy inline content");
            self.fallbacks.push(RenderFallback {
                path: path.clone(),
                reason: "Figure has inline content pending conversion".to_string(),
            });
            return VNode::element("div")
                .with_attr("class", "figure-pending")
                .with_text(format!("TODO: convert figure content: {}", legacy));
        }

        let src = self.resources.get(src).unwrap_or(src);
        let img = VNode::element("img")
            .with_attr("src", src)
            .with_attr("alt", caption.unwrap_or("Figure"))
            .with_attr("loading", "lazy");

        let mut figure = VNode::element("figure").with_child(img);
        if let Some(caption) = caption {
            figure = figure.with_child(VNode::element("figcaption").with_text(caption));
        }
        figure
    }

    fn demo(
        &self,
        name: &str,
        image_id: Option<&str>,
        args: Option<&Map<String, Value>>,
    ) -> Result<VNode, RenderError> {
        let demo = self
            .renderer
            .demos
            .resolve(name)
            .ok_or_else(|| RenderError::UnknownDemo(name.to_string()))?;

        let image_src = image_id
            .and_then(|id| self.resources.get(id))
            .or_else(|| self.resources.first().map(|(_, src)| src))
            .map(str::to_string);
        let props = DemoProps::new(image_src, args.cloned().unwrap_or_default());

        demo.render(&props).map_err(|source| RenderError::Demo {
            name: name.to_string(),
            source,
        })
    }

    fn image_resource(&self, id: &str, src: &str, alt: Option<&str>) -> VNode {
        let current = self.resources.get(id).unwrap_or(src);
        let mut slot = VNode::element("div")
            .with_attr("class", "image-resource")
            .with_attr("data-resource-id", id)
            .with_child(
                VNode::element("img")
                    .with_attr("src", current)
                    .with_attr("alt", alt.unwrap_or("Image"))
                    .with_attr("loading", "lazy"),
            );

        if self.renderer.options.editable {
            slot = slot
                .with_child(
                    VNode::element("button")
                        .with_attr("type", "button")
                        .with_attr("data-action", "replace-image")
                        .with_attr("data-resource-id", id)
                        .with_text("Replace image"),
                )
                .with_child(
                    VNode::element("input")
                        .with_attr("type", "file")
                        .with_attr("accept", "image/*")
                        .with_attr("data-resource-id", id)
                        .with_flag("hidden"),
                );
        }
        slot
    }

    fn tabs(&mut self, path: &BlockPath, default_value: Option<&str>, tabs: &[Tab]) -> VNode {
        let group = VNode::element("div").with_attr("class", "tabs");
        if tabs.is_empty() {
            return group;
        }

        let active = default_value
            .and_then(|value| tabs.iter().position(|tab| tab.value == value))
            .unwrap_or(0);

        let buttons = tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                VNode::element("button")
                    .with_attr("type", "button")
                    .with_attr("role", "tab")
                    .with_attr("data-value", tab.value.as_str())
                    .with_attr("aria-selected", (index == active).to_string())
                    .with_text(tab.label.as_str())
            })
            .collect();
        let list = VNode::element("div")
            .with_attr("class", "tab-list")
            .with_attr("role", "tablist")
            .with_children(buttons);

        let mut panels = Vec::with_capacity(tabs.len());
        for (index, tab) in tabs.iter().enumerate() {
            let tab_path = path.child(index);
            let mut panel = VNode::element("div")
                .with_attr("class", "tab-panel")
                .with_attr("role", "tabpanel")
                .with_attr("data-value", tab.value.as_str());
            if index != active {
                panel = panel.with_flag("inert").with_attr("aria-hidden", "true");
            }
            if let Some(description) = &tab.description {
                panel = panel.with_child(
                    VNode::element("p")
                        .with_attr("class", "tab-description")
                        .with_text(description.as_str()),
                );
            }
            panels.push(panel.with_children(self.blocks(&tab_path, &tab.blocks)));
        }

        group.with_child(list).with_children(panels)
    }
}

fn note(style: NoteStyle, content: &str) -> VNode {
    VNode::element("div")
        .with_attr("class", format!("note note-{}", style))
        .with_attr("role", "note")
        .with_children(markup::paragraphs(content))
}
