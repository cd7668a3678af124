//! refsite CLI - static reference site generator.
//!
//! Provides commands for:
//! - `build`: Render a content directory into a static site
//! - `check`: Report structure and language problems without writing
//! - `routes`: List the route assigned to every source file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RoutesArgs};
use output::Output;

/// refsite - static reference site generator.
#[derive(Parser)]
#[command(name = "refsite", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site.
    Build(BuildArgs),
    /// Load content and report warnings without writing anything.
    Check(CheckArgs),
    /// Print the route of every source file.
    Routes(RoutesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
