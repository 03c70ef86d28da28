//! Loading and saving parameter files

use anyhow::{Context, Result};
use std::path::Path;
use treegen::TreeParams;

/// Load parameters from a TOML file; missing sections and keys take defaults
pub fn load(path: &Path) -> Result<TreeParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid parameter file: {}", path.display()))
}

/// Parse parameters from TOML text
pub fn parse(content: &str) -> Result<TreeParams> {
    let params: TreeParams = toml::from_str(content).context("Failed to parse TOML")?;
    Ok(params)
}

/// Serialize parameters as pretty TOML
pub fn to_toml(params: &TreeParams) -> Result<String> {
    toml::to_string_pretty(params).context("Failed to serialize parameters")
}
