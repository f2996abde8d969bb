//! `frozen-uuids validate` command.

use std::io::Write;
use std::path::Path;

use crate::config::{self, Overrides};

/// Loads an overrides file, resolves it, and writes the effective
/// configuration as YAML.
///
/// # Errors
///
/// Returns an error string if the file cannot be read, does not parse, or
/// resolves to an invalid configuration.
pub fn run(out: &mut impl Write, path: &Path) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read overrides file {}: {e}", path.display()))?;
    let overrides = Overrides::from_yaml_str(&content)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    let config = config::resolve(overrides).map_err(|e| format!("{}: {e}", path.display()))?;

    let yaml = serde_yaml::to_string(&Overrides::from(&config))
        .map_err(|e| format!("Failed to render configuration: {e}"))?;
    write!(out, "{yaml}").map_err(|e| format!("Failed to write output: {e}"))
}
