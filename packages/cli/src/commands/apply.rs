use super::{print_diagnostics, print_json, read_document, resolve_path, OutputFormat};
use anyhow::{Context, Result};
use canopy_document::{has_errors, save_page};
use canopy_editor::{apply_envelope, ComponentRegistry, PatchEnvelope, Registry};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Document JSON file
    #[arg(short, long)]
    pub doc: PathBuf,

    /// Patch JSON file: one patch or an array applied in order
    #[arg(short, long)]
    pub patch: PathBuf,

    /// Component registry JSON (overrides the config)
    #[arg(short, long)]
    pub registry: Option<PathBuf>,

    /// Write the resulting document here instead of printing it
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatchFile {
    Many(Vec<PatchEnvelope>),
    One(PatchEnvelope),
}

pub fn read_envelopes(path: &Path) -> Result<Vec<PatchEnvelope>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read patch {}", path.display()))?;
    let file: PatchFile = serde_json::from_str(&source)
        .with_context(|| format!("Invalid patch {}", path.display()))?;
    Ok(match file {
        PatchFile::Many(envelopes) => envelopes,
        PatchFile::One(envelope) => vec![envelope],
    })
}

pub fn apply(args: ApplyArgs, cwd: &str, configured: Option<Registry>) -> Result<()> {
    let mut page = read_document(cwd, &args.doc)?;
    let envelopes = read_envelopes(&resolve_path(cwd, &args.patch))?;

    let registry = match &args.registry {
        Some(path) => {
            let path = resolve_path(cwd, path);
            Some(
                Registry::load(&path)
                    .with_context(|| format!("Cannot load registry {}", path.display()))?,
            )
        }
        None => configured,
    };
    let registry = registry.as_ref().map(|r| r as &dyn ComponentRegistry);

    let mut diagnostics = Vec::new();
    let mut applied = 0;
    for envelope in &envelopes {
        let outcome = apply_envelope(&page, envelope, registry);
        if outcome.is_applied() {
            applied += 1;
        }
        page = outcome.page;
        diagnostics.extend(outcome.diagnostics);
    }

    match &args.out {
        Some(out) => save_page(&resolve_path(cwd, out), &page)?,
        None if args.format == OutputFormat::Json => print_json(&page)?,
        None => {}
    }

    if args.format == OutputFormat::Text {
        println!(
            "{} Applied {} of {} patch(es)",
            if applied == envelopes.len() {
                "✓".green()
            } else {
                "✗".red()
            },
            applied,
            envelopes.len()
        );
        print_diagnostics(&diagnostics);
        if let Some(out) = &args.out {
            println!("   Output: {}", out.display());
        }
    }

    if has_errors(&diagnostics) {
        anyhow::bail!("{} patch(es) were rejected", envelopes.len() - applied);
    }
    Ok(())
}
