//! treegen - procedural tree generator
//!
//! # Commands
//!
//! - `treegen init` - Write a tree.toml with all default parameters
//! - `treegen check` - Validate a parameter file
//! - `treegen generate` - Grow a tree and write it as OBJ
//!
//! # Usage
//!
//! ```bash
//! treegen init -o oak.toml
//! treegen generate oak.toml -o oak.obj --seed 7
//! treegen generate oak.toml -o oak_skeleton.obj --skeleton --strategy poisson
//! ```
//!
//! Set `RUST_LOG=treegen=trace` for per-branch diagnostics.

mod check;
mod generate;
mod init;
mod params_file;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// treegen - procedural tree generator
#[derive(Parser)]
#[command(name = "treegen")]
#[command(about = "Procedural tree mesh generator")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a parameter file with every default spelled out
    Init(init::InitArgs),

    /// Validate a parameter file without generating
    Check(check::CheckArgs),

    /// Grow a tree and write it as OBJ
    Generate(generate::GenerateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Generate(args) => generate::execute(args),
    }
}
