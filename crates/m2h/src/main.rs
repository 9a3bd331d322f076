//! m2h CLI - Markdown to HTML converter.
//!
//! Provides commands for:
//! - `convert`: Render markdown as HTML
//! - `tree`: Print the converted element tree as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, TreeArgs};
use output::Output;

/// m2h - Markdown to HTML converter.
#[derive(Parser)]
#[command(name = "m2h", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown to HTML.
    Convert(ConvertArgs),
    /// Print the element tree of converted markdown as JSON.
    Tree(TreeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Convert(args) => args.source.verbose,
        Commands::Tree(args) => args.source.verbose,
    };

    // --verbose enables INFO level, otherwise defer to RUST_LOG
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(&output),
        Commands::Tree(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
