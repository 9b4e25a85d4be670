//! # zscope CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zscope_cli::generate::{run_generate, GenerateArgs};
use zscope_cli::inspect::{run_inspect, InspectArgs};

/// Path-scoped Zod schema generator.
///
/// Builds validation schemas that admit exactly the fields and operators a
/// manifest allows, resolved against a model registry.
#[derive(Parser, Debug)]
#[command(name = "zscope", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate schema modules for the targets of a manifest.
    Generate(GenerateArgs),

    /// Summarize the registry and targets of a manifest.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Inspect(args) => run_inspect(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
