//! Typed error taxonomy shared by every component.
//!
//! Callers branch on these variants programmatically; user-facing text is
//! produced at the command layer. An unassignable allocation remainder is
//! not an error — it is part of the allocator's normal summary.

use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::TaskStatus;

/// Errors raised by registry, ledger, store, archive, and command code.
#[derive(Debug, Error)]
pub enum WariateError {
    /// A staff member, task, ledger, or registry could not be found.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing thing (e.g. "staff aiko", "ledger 2025-11-19").
        what: String,
    },

    /// A status change would regress or skip the task lifecycle.
    #[error("task {id}: illegal status change {from} -> {to}")]
    InvalidTransition {
        /// The task whose status change was rejected.
        id: String,
        /// Status before the attempted change.
        from: TaskStatus,
        /// The rejected target status.
        to: TaskStatus,
    },

    /// Appending a task would push a staff member past their capacity.
    #[error("staff {staff} has no remaining capacity for {task_type}")]
    CapacityExceeded {
        /// The staff member at capacity.
        staff: String,
        /// The task type that could not be accepted.
        task_type: String,
    },

    /// A registry or ledger failed structural or semantic validation.
    #[error("{subject}: {detail}")]
    SchemaInvalid {
        /// What failed validation (a file path or "registry").
        subject: String,
        /// What was wrong with it.
        detail: String,
    },

    /// The per-date lock could not be acquired before the timeout.
    #[error("{} is locked by another process", path.display())]
    Busy {
        /// The lock file that stayed held.
        path: PathBuf,
    },

    /// A task identifier did not match the `T<YYYYMMDD>-NNN` shape.
    #[error("malformed task id: {raw}")]
    InvalidId {
        /// The rejected input.
        raw: String,
    },

    /// Filesystem access failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A file could not be serialized or deserialized as YAML.
    #[error("{}: {source}", path.display())]
    Yaml {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying serde failure.
        #[source]
        source: serde_yaml::Error,
    },
}

impl WariateError {
    /// Shorthand for a [`WariateError::NotFound`] with a formatted subject.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for a [`WariateError::Io`] wrapping a port-level error.
    pub fn io(
        context: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Io { context: context.into(), source }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, WariateError>;
