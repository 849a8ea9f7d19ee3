use super::{read_document, resolve_path};
use anyhow::{Context, Result};
use canopy_editor::Patch;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InverseArgs {
    /// Document JSON file the patch would be applied to
    #[arg(short, long)]
    pub doc: PathBuf,

    /// Patch JSON file
    #[arg(short, long)]
    pub patch: PathBuf,
}

pub fn inverse(args: InverseArgs, cwd: &str) -> Result<()> {
    let document = read_document(cwd, &args.doc)?;
    let patch_path = resolve_path(cwd, &args.patch);
    let source = std::fs::read_to_string(&patch_path)
        .with_context(|| format!("Cannot read patch {}", patch_path.display()))?;
    let patch: Patch = serde_json::from_str(&source)
        .with_context(|| format!("Invalid patch {}", patch_path.display()))?;

    match canopy_editor::inverse(&document, &patch) {
        Some(inverse) => println!("{}", serde_json::to_string_pretty(&inverse)?),
        None => println!(
            "{} {} is not invertible here; snapshot the document instead",
            "✗".yellow(),
            patch.op.name()
        ),
    }

    Ok(())
}
