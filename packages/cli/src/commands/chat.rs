use super::{print_diagnostics, read_document, resolve_path};
use crate::config::Config;
use anyhow::Result;
use canopy_document::{has_errors, save_page, UiPage};
use canopy_editor::{ComponentRegistry, Registry, UndoStack};
use canopy_session::{AssetUpdate, Orchestrator, PatchStatus, Role, SessionStore, StoreOptions};
use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Document JSON file to edit
    #[arg(short, long)]
    pub doc: PathBuf,

    /// Session id
    #[arg(short, long, default_value = "cli")]
    pub session: String,

    /// Id or dataUiId of the node edits apply to
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State of an interactive editing loop
pub struct ChatState<'a> {
    session_id: String,
    store: &'a SessionStore,
    registry: Option<&'a dyn ComponentRegistry>,
    undo: UndoStack,
    page: UiPage,
    target: Option<String>,
    doc_path: PathBuf,
}

impl<'a> ChatState<'a> {
    pub fn new(
        store: &'a SessionStore,
        session_id: impl Into<String>,
        page: UiPage,
        doc_path: PathBuf,
        undo_levels: usize,
    ) -> Result<Self> {
        let session_id = session_id.into();
        store.get_or_create_session(&session_id);
        store.update_session_asset(
            &session_id,
            AssetUpdate::asset(doc_path.display().to_string()).with_document(page.clone()),
        )?;

        Ok(Self {
            session_id,
            store,
            registry: None,
            undo: UndoStack::with_max_levels(undo_levels),
            page,
            target: None,
            doc_path,
        })
    }

    pub fn with_registry(mut self, registry: Option<&'a dyn ComponentRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }

    pub fn page(&self) -> &UiPage {
        &self.page
    }

    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        match words.next() {
            None => Ok(Flow::Continue),
            Some("/quit") | Some("/exit") => Ok(Flow::Quit),
            Some("/undo") => {
                let done = self.undo.undo(&mut self.page, self.registry)?;
                self.report_history_step(out, done, "Undone", "Nothing to undo")?;
                Ok(Flow::Continue)
            }
            Some("/redo") => {
                let done = self.undo.redo(&mut self.page, self.registry)?;
                self.report_history_step(out, done, "Redone", "Nothing to redo")?;
                Ok(Flow::Continue)
            }
            Some("/history") => {
                self.print_history(out)?;
                Ok(Flow::Continue)
            }
            Some("/save") => {
                let path = words.next().map(PathBuf::from).unwrap_or_else(|| self.doc_path.clone());
                save_page(&path, &self.page)?;
                writeln!(out, "{} Saved {}", "✓".green(), path.display())?;
                Ok(Flow::Continue)
            }
            Some(_) => {
                self.handle_message(line, out)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one turn and apply every proposal through the undo stack
    fn handle_message(&mut self, message: &str, out: &mut impl Write) -> Result<()> {
        let outcome = Orchestrator::new(self.store).handle_message(
            &self.session_id,
            message,
            self.target.as_deref(),
        );
        writeln!(
            out,
            "{} {} ({:.2})",
            "Intent:".bold(),
            outcome.classification.intent.to_string().cyan(),
            outcome.classification.confidence
        )?;

        let mut applied = 0;
        for proposal in &outcome.patches {
            let diagnostics = self.undo.apply(&proposal.patch, &mut self.page, self.registry);
            print_diagnostics(&diagnostics);
            if has_errors(&diagnostics) {
                writeln!(out, "  {} {}", "✗".red(), proposal.patch.op.name())?;
                continue;
            }
            self.store.update_session_after_patch(
                &self.session_id,
                &proposal.entry_id,
                self.page.clone(),
            )?;
            applied += 1;
            writeln!(
                out,
                "  {} {} on {}",
                "✓".green(),
                proposal.patch.op.name(),
                proposal.patch.target_id
            )?;
        }
        print_diagnostics(&outcome.diagnostics);

        let reply = match (outcome.patches.len(), applied) {
            (0, _) => "No edit recognised.".to_string(),
            (proposed, applied) => format!("Applied {} of {} edit(s).", applied, proposed),
        };
        writeln!(out, "{}", reply)?;
        self.store
            .add_message_to_history(&self.session_id, Role::Assistant, reply, None)?;
        debug!(applied, "Chat turn complete");
        Ok(())
    }

    fn report_history_step(
        &mut self,
        out: &mut impl Write,
        done: bool,
        done_label: &str,
        empty_label: &str,
    ) -> Result<()> {
        if !done {
            writeln!(out, "{}", empty_label.yellow())?;
            return Ok(());
        }
        self.store.update_session_asset(
            &self.session_id,
            AssetUpdate::default().with_document(self.page.clone()),
        )?;
        writeln!(out, "{} {}", "✓".green(), done_label)?;
        Ok(())
    }

    fn print_history(&self, out: &mut impl Write) -> Result<()> {
        let Some(session) = self.store.snapshot(&self.session_id) else {
            return Ok(());
        };
        if session.patch_history.is_empty() {
            writeln!(out, "No patches yet")?;
        }
        for (index, entry) in session.patch_history.iter().enumerate() {
            let status = match entry.status {
                PatchStatus::Applied => "applied".green(),
                PatchStatus::Proposed => "proposed".yellow(),
            };
            writeln!(
                out,
                "{:>3}. [{}] {} {} {}",
                index + 1,
                status,
                entry.timestamp.format("%H:%M:%S"),
                entry.patch.op.name(),
                entry.patch.target_id
            )?;
        }
        Ok(())
    }
}

pub fn chat(args: ChatArgs, cwd: &str, config: &Config, registry: Option<Registry>) -> Result<()> {
    let page = read_document(cwd, &args.doc)?;
    let store = SessionStore::with_options(StoreOptions {
        snapshot_history: config.snapshot_history,
    });
    let registry = registry.as_ref().map(|r| r as &dyn ComponentRegistry);

    let mut state = ChatState::new(
        &store,
        args.session,
        page,
        resolve_path(cwd, &args.doc),
        config.undo_levels,
    )?
    .with_registry(registry)
    .with_target(args.target);

    println!(
        "{} Editing {}. Commands: /undo /redo /history /save [path] /quit",
        "Canopy".green().bold(),
        args.doc.display()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if state.handle_line(&line, &mut stdout)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}
