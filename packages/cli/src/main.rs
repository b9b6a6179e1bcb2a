mod commands;
mod config;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, delete, outline, render, validate, watch, AddArgs, DeleteArgs, OutlineArgs, RenderArgs,
    ValidateArgs, WatchArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Ednotes CLI - author and render block documents
#[derive(Parser, Debug)]
#[command(name = "ednotes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a document against the block schema
    Validate(ValidateArgs),

    /// Render a document to HTML
    Render(RenderArgs),

    /// Print the block outline with paths
    Outline(OutlineArgs),

    /// Insert a template block
    Add(AddArgs),

    /// Remove a block or tab
    Delete(DeleteArgs),

    /// Re-render whenever the document file changes
    Watch(WatchArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    match cli.command {
        Command::Validate(args) => validate(args),
        Command::Render(args) => render(args, &config),
        Command::Outline(args) => outline(args),
        Command::Add(args) => add(args),
        Command::Delete(args) => delete(args),
        Command::Watch(args) => watch(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
