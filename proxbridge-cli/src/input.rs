///! Input file loading
///!
///! Host records, guest configs and compute attributes are read from JSON,
///! YAML or TOML files, chosen by extension.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load and deserialize a file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse(path, &contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(contents)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(contents)?),
        Some("toml") => Ok(toml::from_str(contents)?),
        Some(other) => bail!("Unsupported file type: .{}", other),
        None => bail!("Missing file extension (expected .json, .yaml or .toml)"),
    }
}
