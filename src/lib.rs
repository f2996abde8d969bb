//! Deterministic UUID substitution for reproducible tests.
//!
//! Code under test asks a [`ModuleRegistry`] binding such as `uuid.uuid4` for
//! identifiers. A test freezes that target for its duration: every binding of
//! the factory, in its defining unit and in each unit that imported it, is
//! redirected to one shared [`Generator`] and restored when the returned
//! [`ScopedHandle`] is dropped.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod locator;
pub mod patch;
pub mod path;
pub mod ports;
pub mod shim;

pub use adapters::live::registry::{global, uuid1, uuid4, UnitRegistry};
pub use config::{FreezeConfig, Overrides};
pub use error::FreezeError;
pub use generator::{Generator, Strategy};
pub use identifier::Identifier;
pub use ports::{Binding, ModuleRegistry, UuidFactory};
pub use shim::{activate_for_test, activate_in, freeze, with_frozen_uuids, ScopedHandle};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_marker() {
        let result = run(["frozen-uuids", "marker"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["frozen-uuids", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_unknown_strategy() {
        let result = run(["frozen-uuids", "preview", "--side-effect", "foobar"]);
        assert_eq!(result.unwrap_err(), "unknown side effect: foobar");
    }
}
