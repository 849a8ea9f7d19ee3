use super::{print_diagnostics, print_json, read_document, OutputFormat};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Message describing the edit
    pub message: String,

    /// Document JSON file to parse against
    #[arg(short, long)]
    pub doc: PathBuf,

    /// Id or dataUiId of the selected node
    #[arg(short, long)]
    pub target: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn parse(args: ParseArgs, cwd: &str) -> Result<()> {
    let document = read_document(cwd, &args.doc)?;
    let outcome = canopy_intent::parse(&args.message, &document, args.target.as_deref());

    if args.format == OutputFormat::Json {
        return print_json(&outcome);
    }

    if outcome.is_empty() {
        println!("{} No patches", "✗".yellow());
    } else {
        println!(
            "{} {} patch(es) from {} ({:.2})",
            "✓".green(),
            outcome.patches.len(),
            outcome.pattern.unwrap_or("unknown").cyan(),
            outcome.confidence
        );
        for patch in &outcome.patches {
            println!("   {}", serde_json::to_string(patch)?);
        }
    }
    print_diagnostics(&outcome.diagnostics);

    Ok(())
}
