//! Archiver — relocates ledgers past the retention window into
//! month-partitioned long-term storage.
//!
//! A ledger moves whole: the file is renamed into
//! `<archive root>/YYYY-MM/<date>.yaml`, never split or merged. Because a
//! moved file leaves the active directory, a second run over the same
//! cutoff finds nothing — the operation is idempotent.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::context::ServiceContext;
use crate::error::{Result, WariateError};

/// One ledger eligible for archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCandidate {
    /// The ledger's date.
    pub date: NaiveDate,
    /// Where the ledger currently lives.
    pub path: PathBuf,
}

/// Finds active ledgers strictly older than `today - retention_days`.
///
/// Only `<date>.yaml` entries count; locks, temp files, and strays are
/// ignored. A missing daily directory yields an empty plan.
///
/// # Errors
///
/// Returns [`WariateError::Io`] when the daily directory cannot be listed.
pub fn scan(
    ctx: &ServiceContext,
    daily_dir: &Path,
    retention_days: u32,
    today: NaiveDate,
) -> Result<Vec<ArchiveCandidate>> {
    if !ctx.fs.exists(daily_dir) {
        return Ok(Vec::new());
    }
    let cutoff = today - chrono::Duration::days(i64::from(retention_days));
    let entries = ctx
        .fs
        .list_dir(daily_dir)
        .map_err(|e| WariateError::io("scanning active ledgers", e))?;
    Ok(entries
        .iter()
        .filter_map(|name| name.strip_suffix(".yaml"))
        .filter_map(|stem| stem.parse::<NaiveDate>().ok())
        .filter(|date| *date < cutoff)
        .map(|date| ArchiveCandidate { date, path: daily_dir.join(format!("{date}.yaml")) })
        .collect())
}

/// Destination of an archived ledger: `<archive root>/YYYY-MM/<date>.yaml`.
#[must_use]
pub fn archive_path(archive_root: &Path, date: NaiveDate) -> PathBuf {
    archive_root.join(date.format("%Y-%m").to_string()).join(format!("{date}.yaml"))
}

/// Moves one candidate into the archive tree, creating the year-month
/// partition directory as needed. Returns the destination path.
///
/// # Errors
///
/// Returns [`WariateError::Io`] when the rename fails.
pub fn relocate(
    ctx: &ServiceContext,
    candidate: &ArchiveCandidate,
    archive_root: &Path,
) -> Result<PathBuf> {
    let target = archive_path(archive_root, candidate.date);
    ctx.fs
        .rename(&candidate.path, &target)
        .map_err(|e| WariateError::io(format!("archiving ledger {}", candidate.date), e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn temp_ctx(dir_name: &str) -> (ServiceContext, PathBuf) {
        let dir = std::env::temp_dir().join(dir_name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        (ServiceContext::live(), dir)
    }

    #[test]
    fn scan_keeps_only_strictly_older_ledgers() {
        let (ctx, dir) = temp_ctx("wariate_archive_scan");
        for name in ["2025-10-01.yaml", "2025-10-06.yaml", "2025-11-01.yaml", "junk.txt",
            "2025-10-01.lock"]
        {
            std::fs::write(dir.join(name), "tasks: []\n").unwrap();
        }

        // Cutoff with 30 days of retention from 2025-11-05 is 2025-10-06;
        // the ledger dated exactly on the cutoff stays active.
        let plan = scan(&ctx, &dir, 30, date("2025-11-05")).unwrap();
        let dates: Vec<NaiveDate> = plan.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date("2025-10-01")]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let ctx = ServiceContext::live();
        let dir = std::env::temp_dir().join("wariate_archive_scan_none");
        let _ = std::fs::remove_dir_all(&dir);

        assert!(scan(&ctx, &dir, 30, date("2025-11-05")).unwrap().is_empty());
    }

    #[test]
    fn relocate_moves_into_month_partition() {
        let (ctx, dir) = temp_ctx("wariate_archive_relocate");
        std::fs::write(dir.join("2025-10-01.yaml"), "tasks: []\n").unwrap();
        let archive_root = dir.join("archive");

        let plan = scan(&ctx, &dir, 30, date("2025-11-05")).unwrap();
        assert_eq!(plan.len(), 1);
        let target = relocate(&ctx, &plan[0], &archive_root).unwrap();

        assert_eq!(target, archive_root.join("2025-10").join("2025-10-01.yaml"));
        assert!(target.exists());
        assert!(!dir.join("2025-10-01.yaml").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn second_run_finds_nothing_to_move() {
        let (ctx, dir) = temp_ctx("wariate_archive_idempotent");
        std::fs::write(dir.join("2025-10-01.yaml"), "tasks: []\n").unwrap();
        let archive_root = dir.join("archive");

        let first = scan(&ctx, &dir, 30, date("2025-11-05")).unwrap();
        for candidate in &first {
            relocate(&ctx, candidate, &archive_root).unwrap();
        }
        let second = scan(&ctx, &dir, 30, date("2025-11-05")).unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
