use super::read_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ednotes_blocks::ValidationPolicy;
use ednotes_editor::{outline as flatten, OutlineEntry};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn outline(args: OutlineArgs) -> Result<()> {
    let (_, document) = read_document(&args.file, ValidationPolicy::Closed)?;
    let entries = flatten(&document);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&entries)?),
        "text" => {
            for line in format_entries(&entries) {
                println!("{}", line);
            }
        }
        other => return Err(anyhow::anyhow!("Unknown format: {}", other)),
    }
    Ok(())
}

fn format_entries(entries: &[OutlineEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let label = entry.indented_label();
            if entry.is_tab() {
                label.dimmed().to_string()
            } else {
                label
            }
        })
        .collect()
}
