use super::{policy, read_document};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ednotes_blocks::ImageResourceMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Accept legacy payloads (unknown fields ignored, figure content kept)
    #[arg(long)]
    pub open: bool,
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let (_, document) = read_document(&args.file, policy(args.open))?;
    let resources = ImageResourceMap::from_document(&document);

    println!(
        "{} {} ({} blocks, {} top-level, {} image resources)",
        "✓".green(),
        args.file.display(),
        document.count_blocks(),
        document.len(),
        resources.len()
    );
    Ok(())
}
