mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, chat, classify, inverse, parse, ApplyArgs, ChatArgs, ClassifyArgs, InverseArgs,
    ParseArgs,
};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Canopy CLI - conversational editing of UI page documents
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./canopy.config.json if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a message as generate, edit, patch or unknown
    Classify(ClassifyArgs),

    /// Turn a message into patches against a document
    Parse(ParseArgs),

    /// Apply patches to a document
    Apply(ApplyArgs),

    /// Print the patch that undoes a patch
    Inverse(InverseArgs),

    /// Edit a document interactively
    Chat(ChatArgs),
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, cwd: &str) -> anyhow::Result<()> {
    let config = Config::load(cwd, cli.config.as_deref())?;
    init_logging(&config.log_level);

    match cli.command {
        Command::Classify(args) => classify(args, cwd),
        Command::Parse(args) => parse(args, cwd),
        Command::Apply(args) => apply(args, cwd, config.load_registry(cwd)?),
        Command::Inverse(args) => inverse(args, cwd),
        Command::Chat(args) => chat(args, cwd, &config, config.load_registry(cwd)?),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(cli, &cwd.display().to_string()));

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
