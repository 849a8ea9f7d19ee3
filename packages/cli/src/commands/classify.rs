use super::{print_json, OutputFormat};
use anyhow::Result;
use canopy_intent::ClassifyContext;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Message to classify
    pub message: String,

    /// Classify as if a document already exists
    #[arg(long)]
    pub has_document: bool,

    /// Current asset id, if any
    #[arg(long)]
    pub asset_id: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn classify(args: ClassifyArgs, _cwd: &str) -> Result<()> {
    let context = ClassifyContext {
        has_existing_dsl: args.has_document,
        current_asset_id: args.asset_id,
    };
    let classification = canopy_intent::classify(&args.message, &context);

    if args.format == OutputFormat::Json {
        return print_json(&classification);
    }

    println!(
        "{} {} ({:.2})",
        "Intent:".bold(),
        classification.intent.to_string().cyan().bold(),
        classification.confidence
    );
    if let Some(target) = &classification.target_id {
        println!("   Target:     {}", target);
    }
    if !classification.patch_operations.is_empty() {
        println!("   Operations: {}", classification.patch_operations.join(", "));
    }
    if let Some(metadata) = &classification.metadata {
        if let Some(component) = &metadata.component_name {
            println!("   Component:  {}", component);
        }
        if let (Some(property), Some(value)) = (&metadata.property, &metadata.value) {
            println!("   Property:   {} = {}", property, value);
        }
    }

    Ok(())
}
