pub mod apply;
pub mod chat;
pub mod classify;
pub mod inverse;
pub mod parse;

pub use apply::{apply, ApplyArgs};
pub use chat::{chat, ChatArgs};
pub use classify::{classify, ClassifyArgs};
pub use inverse::{inverse, InverseArgs};
pub use parse::{parse, ParseArgs};

use anyhow::Context;
use canopy_document::{load_page, Diagnostic, DiagnosticLevel, UiPage};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Resolve `path` against the working directory
pub fn resolve_path(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

pub fn read_document(cwd: &str, path: &Path) -> anyhow::Result<UiPage> {
    let path = resolve_path(cwd, path);
    load_page(&path).with_context(|| format!("Cannot load document {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let level = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };
        print!("  {} [{}] {}", level, diagnostic.code, diagnostic.message);
        match &diagnostic.path {
            Some(path) => println!(" {}", format!("at {}", path).dimmed()),
            None => println!(),
        }
    }
}
