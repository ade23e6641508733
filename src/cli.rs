//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::ledger::{TaskId, TaskStatus};

/// Top-level CLI parser for `wariate`.
#[derive(Debug, Parser)]
#[command(name = "wariate", version, about = "Allocate daily shop work across staff")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Allocate a day's work plan onto staff and record the tasks.
    CreateTasks {
        /// Target ledger date; defaults to today in the shop's timezone.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Inline request, repeatable.
        #[arg(long = "task", value_name = "TYPE:COUNT[:PRIORITY]")]
        tasks: Vec<String>,
        /// YAML work plan holding a list of requests.
        #[arg(long, value_name = "FILE")]
        plan: Option<PathBuf>,
        /// Print the allocation summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Append a feedback note to an existing day's ledger.
    AddFeedback {
        /// Staff key of the author.
        #[arg(long)]
        staff: String,
        /// The note text.
        #[arg(long)]
        content: String,
        /// Ledger date; defaults to today in the shop's timezone.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Move a task to a new lifecycle status.
    SetStatus {
        /// Task identifier, e.g. T20251119-001.
        task_id: TaskId,
        /// One of pending, in_progress, done, cancelled.
        status: TaskStatus,
    },
    /// Display a day's tasks and feedback.
    Show {
        /// Ledger date; defaults to today in the shop's timezone.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Move ledgers past the retention window into the archive tree.
    Archive {
        /// Retention window in days; strictly older ledgers move.
        #[arg(long)]
        days: u32,
        /// Report the plan without touching any file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Check registry and ledger files without modifying them.
    Validate {
        /// Files to check; schema is inferred from each file name.
        paths: Vec<PathBuf>,
        /// Check the registry and every active ledger.
        #[arg(long)]
        all: bool,
        /// Print the reports as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_create_tasks_with_inline_requests() {
        let cli = Cli::parse_from([
            "wariate",
            "create-tasks",
            "--date",
            "2025-11-19",
            "--task",
            "査定:7",
            "--task",
            "出品:3:high",
        ]);
        match cli.command {
            Command::CreateTasks { date, tasks, plan, json } => {
                assert_eq!(date.unwrap().to_string(), "2025-11-19");
                assert_eq!(tasks.len(), 2);
                assert!(plan.is_none());
                assert!(!json);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn parses_set_status_with_typed_id() {
        let cli = Cli::parse_from(["wariate", "set-status", "T20251119-001", "done"]);
        match cli.command {
            Command::SetStatus { task_id, status } => {
                assert_eq!(task_id.to_string(), "T20251119-001");
                assert_eq!(status, crate::ledger::TaskStatus::Done);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_task_id() {
        let result = Cli::try_parse_from(["wariate", "set-status", "banana", "done"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_archive_flags() {
        let cli = Cli::parse_from(["wariate", "archive", "--days", "30", "--dry-run"]);
        match cli.command {
            Command::Archive { days, dry_run } => {
                assert_eq!(days, 30);
                assert!(dry_run);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn parses_validate_all() {
        let cli = Cli::parse_from(["wariate", "validate", "--all"]);
        match cli.command {
            Command::Validate { paths, all, json } => {
                assert!(paths.is_empty());
                assert!(all);
                assert!(!json);
            }
            other => panic!("parsed {other:?}"),
        }
    }
}
