use super::{parse_resource, policy, read_document};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ednotes_blocks::{Document, ImageResourceMap};
use ednotes_renderer::{render_page, DemoRegistry, RenderFallback, RenderOptions, Renderer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Point an image resource at another source (repeatable)
    #[arg(long = "resource", value_name = "ID=SRC", value_parser = parse_resource)]
    pub resources: Vec<(String, String)>,

    /// Emit the block markup only, without the page shell
    #[arg(long)]
    pub fragment: bool,

    /// Include image replacement controls
    #[arg(long)]
    pub editable: bool,

    /// Page title (overrides config)
    #[arg(long)]
    pub title: Option<String>,

    /// Disable pretty printing (overrides config)
    #[arg(long)]
    pub compact: bool,

    /// Accept legacy payloads (unknown fields ignored, figure content kept)
    #[arg(long)]
    pub open: bool,
}

/// How a document is turned into HTML
#[derive(Debug, Clone)]
pub struct Output {
    pub fragment: bool,
    pub editable: bool,
    pub title: String,
}

impl Output {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fragment: false,
            editable: false,
            title: config.title.clone(),
        }
    }
}

pub fn render(args: RenderArgs, config: &Config) -> Result<()> {
    let (_, document) = read_document(&args.file, policy(args.open))?;

    let mut resources = resources_for(&document, config);
    for (id, src) in &args.resources {
        resources.replace(id.as_str(), src.as_str());
    }

    let mut config = config.clone();
    if args.compact {
        config.pretty = false;
    }
    let output = Output {
        fragment: args.fragment,
        editable: args.editable,
        title: args.title.unwrap_or_else(|| config.title.clone()),
    };

    let (html, fallbacks) = render_html(&document, &resources, &config, &output);
    report_fallbacks(&fallbacks);

    match &args.output {
        Some(path) => {
            write_output(path, &html)?;
            eprintln!("{} {} → {}", "✓".green(), args.file.display(), path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

/// Resource map declared by the document, with config overrides applied
pub fn resources_for(document: &Document, config: &Config) -> ImageResourceMap {
    let mut resources = ImageResourceMap::from_document(document);
    for (id, src) in &config.resources {
        resources.replace(id.as_str(), src.as_str());
    }
    resources
}

pub fn render_html(
    document: &Document,
    resources: &ImageResourceMap,
    config: &Config,
    output: &Output,
) -> (String, Vec<RenderFallback>) {
    let demos = DemoRegistry::with_mount_points(config.demos.iter().cloned());
    let rendered = Renderer::new(&demos)
        .with_options(RenderOptions {
            editable: output.editable,
        })
        .render(document, resources);

    let options = config.html_options();
    let html = if output.fragment {
        rendered.to_html(&options)
    } else {
        render_page(&rendered, &output.title, &options)
    };
    info!(bytes = html.len(), fragment = output.fragment, "rendered html");
    (html, rendered.fallbacks)
}

pub fn report_fallbacks(fallbacks: &[RenderFallback]) {
    for fallback in fallbacks {
        eprintln!(
            "  {} block {}: {}",
            "!".yellow(),
            fallback.path,
            fallback.reason.yellow()
        );
    }
}

pub fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)?;
    Ok(())
}
