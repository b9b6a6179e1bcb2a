//! Starter blocks handed out by "add block" actions.

use crate::ast::{Block, BlockKind, NoteStyle, Tab};
use serde_json::Map;

impl Block {
    /// Default new block of the given kind.
    pub fn template(kind: BlockKind) -> Block {
        match kind {
            BlockKind::Header => Block::header(2, "New Section"),
            BlockKind::Paragraph => Block::paragraph("Enter paragraph text here..."),
            BlockKind::Code => Block::code("javascript", "console.log(\"Hello\");"),
            BlockKind::Note => Block::note(NoteStyle::Info, "Note content"),
            BlockKind::Figure => Block::Figure {
                src: "image.jpg".to_string(),
                caption: Some("Figure caption".to_string()),
                content: None,
            },
            BlockKind::Equation => Block::Equation {
                content: "x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}".to_string(),
                caption: None,
            },
            BlockKind::List => Block::List {
                ordered: false,
                items: vec!["Item 1".to_string(), "Item 2".to_string()],
            },
            BlockKind::Demo => Block::Demo {
                demo_type: "bubbleSort".to_string(),
                image_id: None,
                args: Some(Map::new()),
            },
            BlockKind::ImageResource => Block::ImageResource {
                id: "image-1".to_string(),
                src: "image.jpg".to_string(),
                alt: Some("Image".to_string()),
            },
            BlockKind::Tabs => Block::Tabs {
                default_value: Some("tab-1".to_string()),
                tabs: vec![
                    Tab::new("tab-1", "Tab 1", vec![Block::paragraph("Tab 1 content")])
                        .with_description("Example tab"),
                    Tab::new("tab-2", "Tab 2", vec![Block::paragraph("Tab 2 content")])
                        .with_description("Another tab"),
                ],
            },
        }
    }
}
