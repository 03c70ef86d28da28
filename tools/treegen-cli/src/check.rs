//! Check command - validate a parameter file without generating

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::params_file;

#[derive(Args)]
pub struct CheckArgs {
    /// Parameter file to validate
    pub params: PathBuf,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let params = params_file::load(&args.params)?;
    params
        .validate()
        .with_context(|| format!("{} failed validation", args.params.display()))?;

    tracing::info!(
        "{} is valid: depth {}, branch counts {:?}",
        args.params.display(),
        params.shape.max_depth,
        params.shape.branch_counts
    );
    Ok(())
}
