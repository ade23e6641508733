//! `wariate archive` command.

use crate::archive::{archive_path, relocate, scan};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::ledger::business_date;
use crate::store::LedgerStore;

/// Execute the `archive` command.
///
/// Scans the active ledgers for files strictly older than the retention
/// window and moves each into its year-month partition. With `dry_run`
/// the plan is printed and nothing is touched. An empty plan is success.
///
/// # Errors
///
/// Returns an error string if the scan fails, a per-date lock cannot be
/// acquired, or a move fails.
pub fn run(ctx: &ServiceContext, config: &Config, days: u32, dry_run: bool) -> Result<(), String> {
    let today = business_date(ctx.clock.now());
    let plan =
        scan(ctx, &config.daily_dir(), days, today).map_err(|e| e.to_string())?;

    if plan.is_empty() {
        println!("Nothing to archive (retention {days} day(s), today {today}).");
        return Ok(());
    }

    if dry_run {
        println!("Dry run — {} ledger(s) would move:", plan.len());
        for candidate in &plan {
            println!(
                "  {} -> {}",
                candidate.path.display(),
                archive_path(&config.archive_root, candidate.date).display()
            );
        }
        return Ok(());
    }

    let store = LedgerStore::new(ctx, config);
    for candidate in &plan {
        // Hold the date's lock so a concurrent mutation cannot race the move.
        let _lock = store.lock_ledger(candidate.date).map_err(|e| e.to_string())?;
        let target = relocate(ctx, candidate, &config.archive_root).map_err(|e| e.to_string())?;
        println!("Archived {} -> {}", candidate.path.display(), target.display());
    }
    println!("{} ledger(s) archived.", plan.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DailyLedger;
    use crate::ports::clock::Clock;
    use chrono::NaiveDate;

    struct NovemberClock;

    impl Clock for NovemberClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            // 2025-11-05 in +09:00.
            "2025-11-05T01:00:00Z".parse().unwrap()
        }
    }

    fn seeded(name: &str) -> (ServiceContext, Config) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let ctx = ServiceContext::with(
            Box::new(NovemberClock),
            Box::new(crate::adapters::live::filesystem::LiveFileSystem),
        );
        let config = Config::rooted_at(dir);
        let date: NaiveDate = "2025-10-01".parse().unwrap();
        LedgerStore::new(&ctx, &config).save_ledger(date, &DailyLedger::new()).unwrap();
        (ctx, config)
    }

    #[test]
    fn dry_run_leaves_the_ledger_in_place() {
        let (ctx, config) = seeded("wariate_cmd_archive_dry");

        run(&ctx, &config, 30, true).unwrap();

        assert!(config.daily_dir().join("2025-10-01.yaml").exists());
        assert!(!config.archive_root.exists());
        let _ = std::fs::remove_dir_all(&config.data_root);
    }

    #[test]
    fn archive_moves_then_finds_nothing() {
        let (ctx, config) = seeded("wariate_cmd_archive_moves");

        run(&ctx, &config, 30, false).unwrap();

        let archived = config.archive_root.join("2025-10").join("2025-10-01.yaml");
        assert!(archived.exists());
        assert!(!config.daily_dir().join("2025-10-01.yaml").exists());
        // Lock released after the move.
        assert!(!config.daily_dir().join("2025-10-01.lock").exists());

        // Second run over the same cutoff is a no-op.
        run(&ctx, &config, 30, false).unwrap();
        assert!(archived.exists());
        let _ = std::fs::remove_dir_all(&config.data_root);
    }

    #[test]
    fn recent_ledgers_stay_active() {
        let (ctx, config) = seeded("wariate_cmd_archive_recent");

        run(&ctx, &config, 60, false).unwrap();

        assert!(config.daily_dir().join("2025-10-01.yaml").exists());
        let _ = std::fs::remove_dir_all(&config.data_root);
    }
}
