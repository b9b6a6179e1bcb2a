//! Rendering driven by an edit session: uploads, raw edits and undo all
//! reach the output through the session's snapshot and resource map.

use ednotes_blocks::{Block, BlockKind, BlockPath};
use ednotes_editor::{EditSession, Mutation};
use ednotes_renderer::{render_page, DemoRegistry, HtmlOptions, Renderer};

const ARTICLE: &str = r#"[
  {"type": "header", "level": 1, "content": "Convolution"},
  {"type": "imageResource", "id": "shapes", "src": "/img/shapes.jpg"},
  {"type": "demo", "demoType": "convolution", "imageId": "shapes"}
]"#;

fn html(session: &EditSession) -> String {
    let demos = DemoRegistry::builtin();
    let html = Renderer::new(&demos)
        .render(&session.snapshot(), session.resources())
        .to_html(&HtmlOptions::compact());
    html
}

#[test]
fn test_upload_rerenders_image_and_demo() {
    let mut session = EditSession::new("convolution.json");
    session.load(ARTICLE).unwrap();
    assert!(html(&session).contains("src=\"/img/shapes.jpg\""));

    let blob = session
        .upload_image("shapes", vec![0x89, 0x50, 0x4e, 0x47], "image/png")
        .unwrap();
    let output = html(&session);

    assert!(output.contains(&format!("src=\"{}\"", blob)));
    assert!(output.contains(&format!("&quot;imageSrc&quot;:&quot;{}&quot;", blob)));
    assert!(!output.contains("/img/shapes.jpg"));
}

#[test]
fn test_malformed_raw_edit_keeps_last_render() {
    let mut session = EditSession::new("convolution.json");
    session.load(ARTICLE).unwrap();
    let before = html(&session);

    session.edit_raw(r#"[{"type": "header", "level": 1, "content": "Broken"#);
    assert_eq!(html(&session), before);

    session.edit_raw(r#"[{"type": "header", "level": 1, "content": "Fixed"}]"#);
    assert_eq!(html(&session), "<h1>Fixed</h1>");
}

#[test]
fn test_undo_restores_rendered_output() {
    let mut session = EditSession::new("convolution.json");
    session.load(ARTICLE).unwrap();
    let before = html(&session);

    session
        .apply(Mutation::insert(
            BlockPath::from([0]),
            Block::template(BlockKind::Note),
        ))
        .unwrap();
    assert!(html(&session).starts_with("<div class=\"note note-info\""));

    assert!(session.undo());
    assert_eq!(html(&session), before);
}

#[test]
fn test_full_page() {
    let mut session = EditSession::new("convolution.json");
    session.load(ARTICLE).unwrap();

    let demos = DemoRegistry::builtin();
    let rendered = Renderer::new(&demos).render(&session.snapshot(), session.resources());
    let page = render_page(&rendered, "Convolution", &HtmlOptions::default());

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Convolution</title>"));
    assert!(page.contains("      <h1>Convolution</h1>\n"));
    assert!(page.trim_end().ends_with("</html>"));
}
