//! Task records, identifiers, statuses, and priorities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::WariateError;

/// Identifier of a task, unique within its owning date.
///
/// Renders as `T<YYYYMMDD>-<seq>` with the sequence zero-padded to three
/// digits (e.g. `T20251119-001`). Ordering follows (date, sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    date: NaiveDate,
    seq: u32,
}

impl TaskId {
    /// Builds an identifier from a date and a sequence number.
    #[must_use]
    pub fn new(date: NaiveDate, seq: u32) -> Self {
        Self { date, seq }
    }

    /// The date this identifier belongs to.
    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.date
    }

    /// The sequence number within the date.
    #[must_use]
    pub fn seq(self) -> u32 {
        self.seq
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}-{:03}", self.date.format("%Y%m%d"), self.seq)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

impl FromStr for TaskId {
    type Err = WariateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WariateError::InvalidId { raw: s.to_string() };
        let rest = s.strip_prefix('T').ok_or_else(invalid)?;
        let (date_part, seq_part) = rest.split_once('-').ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").map_err(|_| invalid())?;
        if seq_part.len() < 3 || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seq: u32 = seq_part.parse().map_err(|_| invalid())?;
        if seq == 0 {
            return Err(invalid());
        }
        Ok(Self { date, seq })
    }
}

impl TryFrom<String> for TaskId {
    type Error = WariateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Lifecycle status of a task.
///
/// Transitions only move forward: `pending` may become `in_progress`,
/// `done`, or `cancelled`; `in_progress` may become `done` or `cancelled`;
/// `done` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not yet started.
    Pending,
    /// Work has begun.
    InProgress,
    /// Finished.
    Done,
    /// Abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Whether this status still counts against staff capacity.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Whether the lifecycle permits moving from this status to `next`.
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::InProgress | Self::Done | Self::Cancelled),
            Self::InProgress => matches!(next, Self::Done | Self::Cancelled),
            Self::Done | Self::Cancelled => false,
        }
    }

    /// The snake_case name used in files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!(
                "unknown status {other} (expected pending, in_progress, done, or cancelled)"
            )),
        }
    }
}

/// How urgently a task should be picked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal day-to-day work.
    #[default]
    Medium,
    /// Do first.
    High,
}

impl Priority {
    /// The lowercase name used in files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority {other} (expected low, medium, or high)")),
        }
    }
}

/// One unit of work in a daily ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    /// Unique identifier within the owning date.
    pub id: TaskId,
    /// Task type; must match a skill registry key to be assignable.
    #[serde(rename = "type")]
    pub task_type: String,
    /// What the task is about.
    pub description: String,
    /// Assignee's staff key, unset while the task is unowned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: Priority,
    /// Expected effort in minutes.
    pub estimated_minutes: u32,
    /// Creation time in the shop's fixed `+09:00` offset.
    pub created_at: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn id_renders_zero_padded() {
        let id = TaskId::new(date("2025-11-19"), 1);
        assert_eq!(id.to_string(), "T20251119-001");
        let id = TaskId::new(date("2025-11-19"), 1042);
        assert_eq!(id.to_string(), "T20251119-1042");
    }

    #[test]
    fn id_parses_and_round_trips() {
        let id: TaskId = "T20251119-007".parse().unwrap();
        assert_eq!(id.date(), date("2025-11-19"));
        assert_eq!(id.seq(), 7);
        assert_eq!(id.to_string(), "T20251119-007");
    }

    #[test]
    fn id_rejects_malformed_input() {
        for raw in ["", "20251119-001", "T2025-001", "T20251119", "T20251119-", "T20251119-ab1",
            "T20251119-000", "T20251119-01"]
        {
            let parsed: Result<TaskId, _> = raw.parse();
            assert!(parsed.is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn id_orders_by_date_then_sequence() {
        let a = TaskId::new(date("2025-11-18"), 9);
        let b = TaskId::new(date("2025-11-19"), 1);
        let c = TaskId::new(date("2025-11-19"), 2);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn status_lifecycle_is_monotonic() {
        use TaskStatus::{Cancelled, Done, InProgress, Pending};

        assert!(Pending.can_become(InProgress));
        assert!(Pending.can_become(Done));
        assert!(Pending.can_become(Cancelled));
        assert!(InProgress.can_become(Done));
        assert!(InProgress.can_become(Cancelled));

        assert!(!InProgress.can_become(Pending));
        assert!(!Done.can_become(Pending));
        assert!(!Done.can_become(InProgress));
        assert!(!Done.can_become(Cancelled));
        assert!(!Cancelled.can_become(Done));
        assert!(!Pending.can_become(Pending));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_yaml::to_string(&TaskStatus::InProgress).unwrap().trim(), "in_progress");
        let status: TaskStatus = serde_yaml::from_str("cancelled").unwrap();
        assert_eq!(status, TaskStatus::Cancelled);
        let bad: Result<TaskStatus, _> = serde_yaml::from_str("paused");
        assert!(bad.is_err());
    }

    #[test]
    fn priority_parses_from_cli_names() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn task_round_trips_through_yaml() {
        let task = Task {
            id: "T20251119-001".parse().unwrap(),
            task_type: "査定".to_string(),
            description: "査定 #1".to_string(),
            assigned_to: Some("aiko".to_string()),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            estimated_minutes: 15,
            created_at: "2025-11-19T09:00:00+09:00".parse().unwrap(),
        };
        let yaml = serde_yaml::to_string(&task).unwrap();
        assert!(yaml.contains("type: 査定"));
        assert!(yaml.contains("+09:00"));
        let back: Task = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(task, back);
    }

    #[test]
    fn task_rejects_unknown_fields() {
        let yaml = "id: T20251119-001\ntype: 査定\ndescription: x\nstatus: pending\n\
                    priority: low\nestimated_minutes: 10\n\
                    created_at: 2025-11-19T09:00:00+09:00\nowner: aiko\n";
        let parsed: Result<Task, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }
}
