//! Init command - write a parameter file with every default spelled out

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use treegen::TreeParams;

use crate::params_file;

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the parameter file
    #[arg(short, long, default_value = "tree.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let text = params_file::to_toml(&TreeParams::default())?;
    std::fs::write(&args.output, text)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!("Wrote default parameters to {}", args.output.display());
    Ok(())
}
