//! Runtime configuration.
//!
//! Every component receives this struct explicitly; there is no ambient
//! project root. Values come from `WARIATE_*` environment variables (a
//! `.env` file is honored) with defaults suited to a single-shop deployment.

use std::path::PathBuf;
use std::time::Duration;

/// Paths and policies shared by all commands.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the data tree (registry, daily ledgers).
    pub data_root: PathBuf,
    /// Root of the month-partitioned archive tree.
    pub archive_root: PathBuf,
    /// How long a command waits for a ledger lock before failing `Busy`.
    pub lock_timeout: Duration,
}

impl Config {
    /// Builds a config from the environment.
    ///
    /// Recognized variables: `WARIATE_DATA` (default `data`),
    /// `WARIATE_ARCHIVE` (default `<data>/archive`),
    /// `WARIATE_LOCK_TIMEOUT_MS` (default `2000`).
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_root =
            std::env::var("WARIATE_DATA").map_or_else(|_| PathBuf::from("data"), PathBuf::from);
        let archive_root = std::env::var("WARIATE_ARCHIVE")
            .map_or_else(|_| data_root.join("archive"), PathBuf::from);
        let lock_timeout = std::env::var("WARIATE_LOCK_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(Duration::from_millis(2000), Duration::from_millis);

        Self { data_root, archive_root, lock_timeout }
    }

    /// Builds a config rooted at an explicit directory, with defaults for
    /// everything else. Used by tests and embedding callers.
    #[must_use]
    pub fn rooted_at(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        let archive_root = data_root.join("archive");
        Self { data_root, archive_root, lock_timeout: Duration::from_millis(2000) }
    }

    /// Path of the skill registry file.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.data_root.join("staff.yaml")
    }

    /// Directory holding active daily ledgers.
    #[must_use]
    pub fn daily_dir(&self) -> PathBuf {
        self.data_root.join("daily")
    }
}
