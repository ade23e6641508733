//! Core library entry for the `wariate` CLI.

pub mod adapters;
pub mod alloc;
pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod registry;
pub mod store;
pub mod validate;

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
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["wariate", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_arguments() {
        let result = run(["wariate", "add-feedback"]);
        assert!(result.is_err());
    }
}
