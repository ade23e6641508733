//! Ledger store — persistence for the skill registry and daily ledgers.
//!
//! All I/O goes through the `FileSystem` port. Directory layout:
//!
//! ```text
//! <data root>/
//!   ├── staff.yaml          skill registry
//!   └── daily/
//!       ├── 2025-11-19.yaml one ledger per date
//!       └── 2025-11-19.lock held while a command mutates that date
//! ```
//!
//! Writes are atomic: content lands in a `.tmp` sibling first and is
//! renamed over the target, so a failure mid-write never leaves a
//! half-written ledger. Mutating commands hold the per-date lock for their
//! whole read-modify-write cycle; unrelated dates are never blocked.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Result, WariateError};
use crate::ledger::DailyLedger;
use crate::ports::filesystem::FileSystem;
use crate::registry::SkillRegistry;

const LOCK_POLL: Duration = Duration::from_millis(25);

/// Persistence layer for the registry and daily ledgers.
pub struct LedgerStore<'a> {
    ctx: &'a ServiceContext,
    config: &'a Config,
}

impl<'a> LedgerStore<'a> {
    /// Creates a store over the given context and configuration.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a Config) -> Self {
        Self { ctx, config }
    }

    /// Path of the ledger file for `date`.
    #[must_use]
    pub fn ledger_path(&self, date: NaiveDate) -> PathBuf {
        self.config.daily_dir().join(format!("{date}.yaml"))
    }

    fn lock_path(&self, date: NaiveDate) -> PathBuf {
        self.config.daily_dir().join(format!("{date}.lock"))
    }

    /// Whether a ledger file exists for `date`.
    #[must_use]
    pub fn ledger_exists(&self, date: NaiveDate) -> bool {
        self.ctx.fs.exists(&self.ledger_path(date))
    }

    /// Loads the ledger for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] when no ledger file exists for the
    /// date, [`WariateError::Yaml`] when the file does not parse.
    pub fn load_ledger(&self, date: NaiveDate) -> Result<DailyLedger> {
        let path = self.ledger_path(date);
        if !self.ctx.fs.exists(&path) {
            return Err(WariateError::not_found(format!("ledger {date}")));
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| WariateError::io(format!("reading ledger {date}"), e))?;
        serde_yaml::from_str(&contents).map_err(|source| WariateError::Yaml { path, source })
    }

    /// Saves the ledger for `date`, replacing any existing file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::Yaml`] on serialization failure and
    /// [`WariateError::Io`] when the write or rename fails.
    pub fn save_ledger(&self, date: NaiveDate, ledger: &DailyLedger) -> Result<()> {
        let path = self.ledger_path(date);
        let yaml = serde_yaml::to_string(ledger)
            .map_err(|source| WariateError::Yaml { path: path.clone(), source })?;
        self.replace_atomically(&path, &yaml, &format!("writing ledger {date}"))
    }

    /// Loads the skill registry.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] when the registry file is absent,
    /// [`WariateError::Yaml`] when it does not parse.
    pub fn load_registry(&self) -> Result<SkillRegistry> {
        let path = self.config.registry_path();
        if !self.ctx.fs.exists(&path) {
            return Err(WariateError::not_found(format!("registry {}", path.display())));
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| WariateError::io("reading registry", e))?;
        serde_yaml::from_str(&contents).map_err(|source| WariateError::Yaml { path, source })
    }

    /// Saves the skill registry atomically.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::Yaml`] on serialization failure and
    /// [`WariateError::Io`] when the write or rename fails.
    pub fn save_registry(&self, registry: &SkillRegistry) -> Result<()> {
        let path = self.config.registry_path();
        let yaml = serde_yaml::to_string(registry)
            .map_err(|source| WariateError::Yaml { path: path.clone(), source })?;
        self.replace_atomically(&path, &yaml, "writing registry")
    }

    /// Dates of all active ledgers, ascending. Entries that are not
    /// `<date>.yaml` (locks, temp files, strays) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::Io`] when the daily directory cannot be read.
    pub fn list_ledger_dates(&self) -> Result<Vec<NaiveDate>> {
        let dir = self.config.daily_dir();
        if !self.ctx.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let entries = self
            .ctx
            .fs
            .list_dir(&dir)
            .map_err(|e| WariateError::io("listing daily ledgers", e))?;
        Ok(entries
            .iter()
            .filter_map(|name| name.strip_suffix(".yaml"))
            .filter_map(|stem| stem.parse().ok())
            .collect())
    }

    /// Acquires the mutation lock for `date`, polling until the configured
    /// timeout.
    ///
    /// The returned guard releases the lock when dropped, on every exit
    /// path. Locking is per-date: commands touching other dates proceed.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::Busy`] when the lock stays held past the
    /// timeout and [`WariateError::Io`] when the lock file cannot be
    /// created for any other reason.
    pub fn lock_ledger(&self, date: NaiveDate) -> Result<LedgerLock<'a>> {
        let path = self.lock_path(date);
        let token = Uuid::new_v4().to_string();
        let deadline = Instant::now() + self.config.lock_timeout;
        loop {
            let created = self
                .ctx
                .fs
                .create_new(&path, &token)
                .map_err(|e| WariateError::io(format!("locking ledger {date}"), e))?;
            if created {
                return Ok(LedgerLock { fs: self.ctx.fs.as_ref(), path, token });
            }
            if Instant::now() >= deadline {
                return Err(WariateError::Busy { path });
            }
            std::thread::sleep(LOCK_POLL);
        }
    }

    fn replace_atomically(&self, path: &Path, contents: &str, context: &str) -> Result<()> {
        let tmp = path.with_extension("yaml.tmp");
        self.ctx
            .fs
            .write(&tmp, contents)
            .map_err(|e| WariateError::io(context.to_string(), e))?;
        self.ctx
            .fs
            .rename(&tmp, path)
            .map_err(|e| WariateError::io(context.to_string(), e))
    }
}

/// Holds the per-date mutation lock; dropping it releases the lock.
///
/// Release only removes the lock file while it still contains this guard's
/// token, so a guard never deletes a lock it does not own.
pub struct LedgerLock<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
    token: String,
}

impl std::fmt::Debug for LedgerLock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerLock")
            .field("path", &self.path)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl Drop for LedgerLock<'_> {
    fn drop(&mut self) {
        match self.fs.read_to_string(&self.path) {
            Ok(contents) if contents == self.token => {
                if let Err(e) = self.fs.remove_file(&self.path) {
                    eprintln!("Warning: failed to release lock {}: {e}", self.path.display());
                }
            }
            _ => {}
        }
    }
}
