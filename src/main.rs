//! Binary entrypoint for the `wariate` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match wariate::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
