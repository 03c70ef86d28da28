//! Generate command - grow a tree and write it as OBJ

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use treegen::{GuideStrategy, TreeParams};

use crate::params_file;

#[derive(Clone, Copy, ValueEnum)]
pub enum Strategy {
    Scored,
    Poisson,
}

impl From<Strategy> for GuideStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Scored => GuideStrategy::Scored,
            Strategy::Poisson => GuideStrategy::Poisson,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Parameter file (defaults are used when omitted)
    pub params: Option<PathBuf>,

    /// Output .obj file
    #[arg(short, long, default_value = "tree.obj")]
    pub output: PathBuf,

    /// Seed for every random source, overriding the file
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// Write the bare skeleton (lines) instead of the bark mesh
    #[arg(long)]
    pub skeleton: bool,

    /// Guide placement strategy, overriding the file
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Object name in the OBJ file (defaults to the output file stem)
    #[arg(long)]
    pub name: Option<String>,
}

impl GenerateArgs {
    /// Parameters after applying command-line overrides
    fn resolve(&self) -> Result<TreeParams> {
        let mut params = match &self.params {
            Some(path) => params_file::load(path)?,
            None => TreeParams::default(),
        };
        if let Some(seed) = self.seed {
            params = params.with_seed(seed);
        }
        if self.skeleton {
            params.output.faces = false;
        }
        if let Some(strategy) = self.strategy {
            params.sampling.strategy = strategy.into();
        }
        Ok(params)
    }
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let params = args.resolve()?;
    let mesh = treegen::generate(&params).context("Tree generation failed")?;

    let name = args.name.clone().unwrap_or_else(|| {
        args.output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tree".to_string())
    });
    treegen::write_obj(&mesh, &args.output, &name)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        "Wrote {} ({} verts, {} faces, {} edges)",
        args.output.display(),
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.edges.len()
    );
    Ok(())
}
