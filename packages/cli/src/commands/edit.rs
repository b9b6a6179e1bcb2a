use super::parse_failure;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use ednotes_blocks::{serialize, Block, BlockKind, BlockPath};
use ednotes_editor::{EditSession, EditorError, Mutation, MutationResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Block type, e.g. header, tabs, imageResource
    pub kind: BlockKind,

    /// Insert at this path (e.g. 2.0.1); appends to the document otherwise
    #[arg(long)]
    pub at: Option<BlockPath>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Block or tab path to remove (e.g. 2.0)
    pub path: BlockPath,
}

pub fn add(args: AddArgs) -> Result<()> {
    let block = Block::template(args.kind);
    let mutation = match args.at {
        Some(path) => Mutation::insert(path, block),
        None => Mutation::insert_top(block),
    };
    edit_file(&args.file, mutation)
}

pub fn delete(args: DeleteArgs) -> Result<()> {
    edit_file(&args.file, Mutation::delete(args.path))
}

/// Apply one mutation to a document file and write it back.
fn edit_file(file: &Path, mutation: Mutation) -> Result<()> {
    let source = fs::read_to_string(file)
        .map_err(|e| anyhow!("Cannot read {}: {}", file.display(), e))?;

    let mut session = EditSession::new(file.display().to_string());
    session.load(&source).map_err(|e| match e {
        EditorError::Parse(error) => parse_failure(file, &source, &error),
        other => other.into(),
    })?;

    let result = session.apply(mutation)?;
    fs::write(file, serialize(session.document()))?;
    report(&result);
    Ok(())
}

fn report(result: &MutationResult) {
    let mut applied = result.applied.iter();
    if let Some(primary) = applied.next() {
        println!("{} {}", "✓".green(), primary.describe());
    }
    for secondary in applied {
        println!("  {} {}", "↳".dimmed(), secondary.describe().dimmed());
    }
}
