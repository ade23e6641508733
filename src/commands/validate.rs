//! `wariate validate` command.

use std::path::PathBuf;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::store::LedgerStore;
use crate::validate::{format_reports, validate_ledger_file, validate_path, validate_registry_file};

/// Execute the `validate` command.
///
/// Checks the given files, or with `--all` the registry plus every active
/// ledger, and prints a per-file pass/fail report. Exit is success only
/// when every file passes.
///
/// # Errors
///
/// Returns an error string when any file fails validation, when no files
/// were selected, or when the active ledgers cannot be listed.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    paths: &[PathBuf],
    all: bool,
    json: bool,
) -> Result<(), String> {
    let store = LedgerStore::new(ctx, config);
    // Reference checks need the registry; a broken or absent registry file
    // simply disables them (and is itself reported under --all).
    let registry = store.load_registry().ok();

    let mut reports = Vec::new();
    if all {
        reports.push(validate_registry_file(ctx, &config.registry_path()));
        for date in store.list_ledger_dates().map_err(|e| e.to_string())? {
            reports.push(validate_ledger_file(ctx, &store.ledger_path(date), registry.as_ref()));
        }
    }
    for path in paths {
        reports.push(validate_path(ctx, path, registry.as_ref()));
    }
    if reports.is_empty() {
        return Err("Nothing to validate: pass file paths or --all.".to_string());
    }

    if json {
        let rendered = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to render reports: {e}"))?;
        println!("{rendered}");
    } else {
        println!("{}", format_reports(&reports));
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        return Err(format!("{failed} file(s) failed validation."));
    }
    Ok(())
}
