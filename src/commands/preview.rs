//! `frozen-uuids preview` command.

use std::io::Write;

use crate::config::{self, Overrides};
use crate::generator::Generator;

/// Writes the first `count` identifiers the configuration would produce, one
/// per line.
///
/// # Errors
///
/// Returns an error string if the configuration is invalid, if a finite
/// sequence runs out before `count` values, or if writing fails. Values drawn
/// before exhaustion are still written.
pub fn run(out: &mut impl Write, overrides: Overrides, count: usize) -> Result<(), String> {
    let config = config::resolve(overrides).map_err(|e| e.to_string())?;
    let mut generator = Generator::from_config(&config).map_err(|e| e.to_string())?;
    for _ in 0..count {
        let id = generator.draw().map_err(|e| e.to_string())?;
        writeln!(out, "{id}").map_err(|e| format!("Failed to write output: {e}"))?;
    }
    Ok(())
}
