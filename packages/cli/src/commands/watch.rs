use super::{parse_failure, policy};
use super::render::{render_html, report_fallbacks, write_output, Output};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use ednotes_blocks::ValidationPolicy;
use ednotes_editor::{Diagnostic, EditSession, EditorError, SyncEvent, ViewMode};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use tracing::{debug, warn};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Document file (JSON array of blocks)
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the block markup only, without the page shell
    #[arg(long)]
    pub fragment: bool,

    /// Accept legacy payloads (unknown fields ignored, figure content kept)
    #[arg(long)]
    pub open: bool,
}

pub fn watch(args: WatchArgs, config: &Config) -> Result<()> {
    let mut output = Output::from_config(config);
    output.fragment = args.fragment;

    let mut live = LiveDocument::open(
        &args.file,
        policy(args.open),
        config.clone(),
        output,
        args.output.clone(),
    )?;
    let watcher = FileWatcher::new(&args.file)?;

    println!(
        "{} {}",
        "👀 Watching".bright_blue().bold(),
        args.file.display()
    );

    while let Some(event) = watcher.next_event() {
        if !touches(&event, &args.file) {
            continue;
        }
        let text = match fs::read_to_string(&args.file) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %args.file.display(), "cannot read watched file: {}", e);
                continue;
            }
        };

        match live.refresh(text)? {
            Refresh::Rendered { fallbacks } => {
                println!("  {} re-rendered ({} fallbacks)", "✓".green(), fallbacks)
            }
            Refresh::Rejected(diagnostic) => {
                eprintln!("  {} {}", "✗".red(), describe(&diagnostic).red())
            }
            Refresh::Unchanged => {}
        }
    }

    Ok(())
}

/// Outcome of feeding new file text to the live document
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Rendered { fallbacks: usize },
    Rejected(Diagnostic),
    Unchanged,
}

/// A watched document: the raw view is the file on disk.
pub struct LiveDocument {
    session: EditSession,
    config: Config,
    output: Output,
    destination: Option<PathBuf>,
}

impl LiveDocument {
    pub fn open(
        file: &Path,
        policy: ValidationPolicy,
        config: Config,
        output: Output,
        destination: Option<PathBuf>,
    ) -> Result<Self> {
        let source = fs::read_to_string(file)
            .map_err(|e| anyhow!("Cannot read {}: {}", file.display(), e))?;

        let mut session = EditSession::new(file.display().to_string());
        session.set_policy(policy);
        session.load(&source).map_err(|e| match e {
            EditorError::Parse(error) => parse_failure(file, &source, &error),
            other => other.into(),
        })?;
        session.set_mode(ViewMode::Raw);
        for (id, src) in &config.resources {
            session.set_resource(id.as_str(), src.as_str());
        }
        session.drain_events();

        let live = Self {
            session,
            config,
            output,
            destination,
        };
        live.emit()?;
        Ok(live)
    }

    pub fn refresh(&mut self, text: String) -> Result<Refresh> {
        if text == self.session.raw() {
            return Ok(Refresh::Unchanged);
        }

        self.session.edit_raw(text);
        let mut outcome = Refresh::Unchanged;
        for event in self.session.drain_events() {
            debug!(?event, "sync event");
            match event {
                SyncEvent::RawRejected(diagnostic) => outcome = Refresh::Rejected(diagnostic),
                SyncEvent::DocumentReplaced { .. } => {
                    outcome = Refresh::Rendered {
                        fallbacks: self.emit()?,
                    }
                }
                SyncEvent::RawRefreshed { .. }
                | SyncEvent::RawShelved
                | SyncEvent::StructuralSuperseded { .. } => {}
            }
        }
        Ok(outcome)
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Render the current snapshot, returning the number of fallbacks
    fn emit(&self) -> Result<usize> {
        let snapshot = self.session.snapshot();
        let (html, fallbacks) =
            render_html(&snapshot, self.session.resources(), &self.config, &self.output);
        report_fallbacks(&fallbacks);

        match &self.destination {
            Some(path) => write_output(path, &html)?,
            None => print!("{}", html),
        }
        Ok(fallbacks.len())
    }
}

fn describe(diagnostic: &Diagnostic) -> String {
    match (diagnostic.line, diagnostic.column, &diagnostic.path) {
        (Some(line), Some(column), _) => {
            format!("line {}, column {}: {}", line, column, diagnostic.message)
        }
        (_, _, Some(path)) => format!("block {}: {}", path, diagnostic.message),
        _ => diagnostic.message.clone(),
    }
}

fn touches(event: &Event, file: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == file.file_name())
}

/// Watches the directory holding a file so editors that save by rename are
/// still seen.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
}

impl FileWatcher {
    pub fn new(file: &Path) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            NotifyConfig::default(),
        )?;

        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Next event; `None` once the watcher is gone
    pub fn next_event(&self) -> Option<Event> {
        loop {
            match self.receiver.recv() {
                Ok(Ok(event)) => return Some(event),
                Ok(Err(e)) => warn!("watch error: {}", e),
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"[{"type": "header", "level": 1, "content": "Draft"}]"#;

    fn output() -> (Config, Output) {
        let mut config = Config::default();
        config.pretty = false;
        let mut output = Output::from_config(&config);
        output.fragment = true;
        (config, output)
    }

    fn open(dir: &Path) -> (PathBuf, PathBuf, LiveDocument) {
        let file = dir.join("draft.json");
        let out = dir.join("draft.html");
        fs::write(&file, ARTICLE).unwrap();

        let (config, output) = output();
        let live = LiveDocument::open(&file, ValidationPolicy::Closed, config, output, Some(out.clone()))
            .unwrap();
        (file, out, live)
    }

    #[test]
    fn test_open_renders_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let (_, out, live) = open(dir.path());
        assert_eq!(fs::read_to_string(out).unwrap(), "<h1>Draft</h1>");
        assert_eq!(live.session().sync().mode(), ViewMode::Raw);
    }

    #[test]
    fn test_refresh_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let (_, out, mut live) = open(dir.path());

        assert_eq!(live.refresh(ARTICLE.to_string()).unwrap(), Refresh::Unchanged);

        let broken = r#"[{"type": "header", "level": 1, "content": "Fin"#;
        match live.refresh(broken.to_string()).unwrap() {
            Refresh::Rejected(diagnostic) => assert!(diagnostic.line.is_some()),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&out).unwrap(), "<h1>Draft</h1>");

        let fixed = r#"[{"type": "header", "level": 2, "content": "Final"}]"#;
        assert_eq!(
            live.refresh(fixed.to_string()).unwrap(),
            Refresh::Rendered { fallbacks: 0 }
        );
        assert_eq!(fs::read_to_string(&out).unwrap(), "<h2>Final</h2>");
    }

    #[test]
    fn test_open_policy_watches_legacy_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("legacy.json");
        let out = dir.path().join("legacy.html");
        fs::write(&file, r#"[{"type": "paragraph", "content": "a", "draft": true}]"#).unwrap();

        let (config, output) = output();
        assert!(LiveDocument::open(
            &file,
            ValidationPolicy::Closed,
            config.clone(),
            output.clone(),
            Some(out.clone())
        )
        .is_err());

        let mut live =
            LiveDocument::open(&file, ValidationPolicy::Open, config, output, Some(out.clone()))
                .unwrap();
        let legacy = r#"[{"type": "figure", "src": "a.png", "content": "draw this later"}]"#;
        assert_eq!(
            live.refresh(legacy.to_string()).unwrap(),
            Refresh::Rendered { fallbacks: 1 }
        );
        assert!(fs::read_to_string(out).unwrap().contains("figure-pending"));
    }

    #[test]
    fn test_describe_diagnostic() {
        let diagnostic = Diagnostic {
            message: "unknown field".to_string(),
            line: None,
            column: None,
            path: Some(ednotes_blocks::BlockPath::from([1])),
        };
        assert_eq!(describe(&diagnostic), "block 1: unknown field");
    }

    #[test]
    fn test_touches_matches_file_name() {
        let file = Path::new("/tmp/notes/draft.json");
        let event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/notes/draft.json"));
        assert!(touches(&event, file));

        let other = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/notes/other.json"));
        assert!(!touches(&other, file));
    }
}
