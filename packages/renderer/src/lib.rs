//! # Ednotes Renderer
//!
//! Turns a document snapshot and its image resources into a virtual DOM,
//! then into HTML.
//!
//! ## Usage
//!
//! ```rust
//! use ednotes_blocks::{parse, ImageResourceMap};
//! use ednotes_renderer::{DemoRegistry, HtmlOptions, Renderer};
//!
//! let doc = parse(r#"[{"type": "demo", "demoType": "quickSort"}]"#).unwrap();
//! let demos = DemoRegistry::builtin();
//! let rendered = Renderer::new(&demos).render(&doc, &ImageResourceMap::new());
//!
//! assert_eq!(rendered.fallbacks.len(), 1);
//! assert!(rendered
//!     .to_html(&HtmlOptions::compact())
//!     .contains("Demo not found: quickSort"));
//! ```

mod demos;
mod html;
pub mod markup;
mod math;
mod render;
mod vdom;


pub use demos::{Demo, DemoError, DemoProps, DemoProvider, DemoRegistry, MountPoint, BUILTIN_DEMOS};
pub use html::{escape_html, is_void, render_page, HtmlOptions};
pub use math::{MathError, MathTypesetter, TexSource};
pub use render::{RenderError, RenderFallback, RenderOptions, Rendered, Renderer};
pub use vdom::VNode;
