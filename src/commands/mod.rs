//! Command dispatch and handlers.

pub mod preview;
pub mod validate;

use crate::cli::Command;
use crate::config::Overrides;
use crate::shim::marker_description;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Preview { side_effect, seed, version, values, count } => {
            let overrides = Overrides {
                side_effect: side_effect.clone(),
                seed: *seed,
                version: *version,
                values: if values.is_empty() { None } else { Some(values.clone()) },
                ..Overrides::default()
            };
            preview::run(&mut std::io::stdout().lock(), overrides, *count)
        }
        Command::Validate { file } => validate::run(&mut std::io::stdout().lock(), file),
        Command::Marker => {
            println!("{}", marker_description());
            Ok(())
        }
    }
}
