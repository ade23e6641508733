//! Filesystem port.

use std::path::Path;

/// Boxed error type crossing the port boundary.
pub type FsError = Box<dyn std::error::Error + Send + Sync>;

/// File access for ledgers, the registry, locks, and the archive tree.
///
/// All persistence goes through this trait so the store, archiver, and
/// validator can run against an in-memory implementation in tests.
pub trait FileSystem: Send + Sync {
    /// Reads an entire file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, FsError>;

    /// Writes `contents` to `path`, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, path: &Path, contents: &str) -> Result<(), FsError>;

    /// Returns `true` if `path` exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists the entry names of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a readable directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, FsError>;

    /// Renames `from` to `to`, creating `to`'s parent directories first.
    ///
    /// Used both for atomic ledger replacement and for relocating ledgers
    /// into the archive tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Creates `path` with `contents` only if it does not already exist.
    ///
    /// Returns `Ok(false)` when the file is already present (the caller is
    /// contending for a lock), `Ok(true)` when this call created it.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the file already existing.
    fn create_new(&self, path: &Path, contents: &str) -> Result<bool, FsError>;

    /// Removes a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), FsError>;
}
