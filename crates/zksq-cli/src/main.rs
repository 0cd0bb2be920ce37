//! # zksq CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zksq_cli::demo::{run_demo, DemoArgs};
use zksq_cli::serve::{run_serve, ServeArgs};
use zksq_cli::setup::{run_setup, SetupArgs};

/// zksq — interactive zero-knowledge magic-square demonstration
///
/// Two parties walk through one proof: the Prover fills the missing cells
/// of a magic square and generates a zero-knowledge proof of the solution;
/// the Verifier checks it against the public verification key without
/// learning the filled-in values.
#[derive(Parser, Debug)]
#[command(name = "zksq", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the demonstration API for the web front end.
    Serve(ServeArgs),

    /// Walk the whole prove/verify demonstration in the terminal.
    Demo(DemoArgs),

    /// Write the backends' artifact sets to a directory.
    Setup(SetupArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
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
        Commands::Serve(args) => run_serve(&args),
        Commands::Demo(args) => run_demo(&args),
        Commands::Setup(args) => run_setup(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
