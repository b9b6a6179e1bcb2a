//! Renderer benchmarks
//!
//! Target: render a 500-block article to HTML in <5ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ednotes_blocks::{parse, Document, ImageResourceMap};
use ednotes_renderer::{DemoRegistry, HtmlOptions, Renderer};

fn generate_article(sections: usize) -> String {
    let mut blocks = Vec::new();

    blocks.push(r#"{"type": "imageResource", "id": "hero", "src": "/img/hero.jpg"}"#.to_string());
    for i in 0..sections {
        blocks.push(format!(
            r#"{{"type": "header", "level": 2, "content": "Section {}"}}"#,
            i
        ));
        blocks.push(format!(
            r#"{{"type": "paragraph", "content": "Paragraph {} with **strong**, *emphasis* and [a link](https://example.com/{})."}}"#,
            i, i
        ));
        blocks.push(r#"{"type": "equation", "content": "\\sum_{i=0}^{n} i = \\frac{n(n+1)}{2}"}"#.to_string());
        blocks.push(format!(
            r#"{{"type": "tabs", "tabs": [
                {{"value": "js", "label": "JavaScript", "blocks": [{{"type": "code", "language": "javascript", "content": "let x = {};"}}]}},
                {{"value": "py", "label": "Python", "blocks": [{{"type": "list", "ordered": false, "items": ["a", "*b*"]}}]}}
            ]}}"#,
            i
        ));
        blocks.push(r#"{"type": "demo", "demoType": "convolution", "imageId": "hero"}"#.to_string());
    }

    format!("[{}]", blocks.join(","))
}

fn load(sections: usize) -> (Document, ImageResourceMap) {
    let doc = parse(&generate_article(sections)).unwrap();
    let resources = ImageResourceMap::from_document(&doc);
    (doc, resources)
}

fn render_small_article(c: &mut Criterion) {
    let (doc, resources) = load(5);
    let demos = DemoRegistry::builtin();
    let renderer = Renderer::new(&demos);

    c.bench_function("render_small_article", |b| {
        b.iter(|| renderer.render(black_box(&doc), black_box(&resources)))
    });
}

fn render_large_article(c: &mut Criterion) {
    let (doc, resources) = load(100);
    let demos = DemoRegistry::builtin();
    let renderer = Renderer::new(&demos);

    c.bench_function("render_large_article", |b| {
        b.iter(|| renderer.render(black_box(&doc), black_box(&resources)))
    });
}

fn render_to_html(c: &mut Criterion) {
    let (doc, resources) = load(100);
    let demos = DemoRegistry::builtin();
    let rendered = Renderer::new(&demos).render(&doc, &resources);
    let options = HtmlOptions::default();

    c.bench_function("emit_html_large_article", |b| {
        b.iter(|| rendered.to_html(black_box(&options)))
    });
}

fn parse_and_render(c: &mut Criterion) {
    let source = generate_article(20);
    let demos = DemoRegistry::builtin();
    let renderer = Renderer::new(&demos);

    c.bench_function("parse_render_emit", |b| {
        b.iter(|| {
            let doc = parse(black_box(&source)).unwrap();
            let resources = ImageResourceMap::from_document(&doc);
            renderer
                .render(&doc, &resources)
                .to_html(&HtmlOptions::compact())
        })
    });
}

criterion_group!(
    benches,
    render_small_article,
    render_large_article,
    render_to_html,
    parse_and_render
);
criterion_main!(benches);
