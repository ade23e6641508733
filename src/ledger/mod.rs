//! Daily task ledger — the ordered tasks and feedback for one calendar date.
//!
//! A ledger belongs to exactly one date and is persisted as a single YAML
//! file named after it. Task order is creation order and is never changed
//! by sorting; feedback is append-only.

mod feedback;
mod task;

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use feedback::FeedbackEntry;
pub use task::{Priority, Task, TaskId, TaskStatus};

use crate::error::{Result, WariateError};
use crate::registry::SkillRegistry;

/// The shop's fixed business offset. Every persisted timestamp carries it.
#[must_use]
pub fn business_offset() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("+09:00 is a valid offset")
}

/// Converts an instant to shop-local time.
#[must_use]
pub fn business_time(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    now.with_timezone(&business_offset())
}

/// The calendar date an instant falls on in shop-local time.
#[must_use]
pub fn business_date(now: DateTime<Utc>) -> NaiveDate {
    business_time(now).date_naive()
}

/// A staff member's open workload on one date.
///
/// Counts only tasks whose status is `pending` or `in_progress`; finished
/// and cancelled tasks no longer occupy capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffLoad {
    /// Open task count across all types.
    pub total: u32,
    /// Sum of `estimated_minutes` across open tasks.
    pub minutes: u32,
    per_type: BTreeMap<String, u32>,
}

impl StaffLoad {
    /// Open task count for one task type.
    #[must_use]
    pub fn count_for(&self, task_type: &str) -> u32 {
        self.per_type.get(task_type).copied().unwrap_or(0)
    }

    /// Iterates (task type, open count) pairs in type order.
    pub fn per_type(&self) -> impl Iterator<Item = (&String, u32)> {
        self.per_type.iter().map(|(t, c)| (t, *c))
    }
}

/// All tasks and feedback recorded for one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyLedger {
    /// Tasks in creation order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Feedback entries in append order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedbacks: Vec<FeedbackEntry>,
    /// Free-form daily metrics snapshot; allocator input only, never
    /// produced or interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_summary: Option<serde_yaml::Value>,
}

impl DailyLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next identifier for `date`: one past the highest sequence
    /// number already present, starting from 1.
    ///
    /// Sequential use only; concurrent invocations are serialized by the
    /// per-date file lock in the store.
    #[must_use]
    pub fn next_id(&self, date: NaiveDate) -> TaskId {
        let max = self
            .tasks
            .iter()
            .filter(|t| t.id.date() == date)
            .map(|t| t.id.seq())
            .max()
            .unwrap_or(0);
        TaskId::new(date, max + 1)
    }

    /// Appends a task, preserving creation order. No capacity checks; use
    /// [`Self::append_assigned`] for tasks that carry an assignee.
    pub fn append(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Appends a task after checking the assignee against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown assignee and
    /// [`WariateError::CapacityExceeded`] when the task would not fit the
    /// assignee's remaining capacity (including when they lack the skill).
    /// The ledger is unchanged on error.
    pub fn append_assigned(&mut self, task: Task, registry: &SkillRegistry) -> Result<()> {
        let Some(staff_key) = task.assigned_to.clone() else {
            self.tasks.push(task);
            return Ok(());
        };
        let staff = registry.get(&staff_key)?;
        let load = self.staff_load(&staff_key);
        if !staff.within_capacity(&load, &task.task_type, task.estimated_minutes) {
            return Err(WariateError::CapacityExceeded {
                staff: staff_key,
                task_type: task.task_type,
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Moves a task to a new status, enforcing the forward-only lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown identifier and
    /// [`WariateError::InvalidTransition`] for a regressing or repeated
    /// status. The ledger is unchanged on error.
    pub fn update_status(&mut self, id: TaskId, new_status: TaskStatus) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| WariateError::not_found(format!("task {id}")))?;
        if !task.status.can_become(new_status) {
            return Err(WariateError::InvalidTransition {
                id: id.to_string(),
                from: task.status,
                to: new_status,
            });
        }
        task.status = new_status;
        Ok(())
    }

    /// Computes the open workload of one staff member.
    #[must_use]
    pub fn staff_load(&self, staff: &str) -> StaffLoad {
        let mut load = StaffLoad::default();
        for task in &self.tasks {
            if task.assigned_to.as_deref() == Some(staff) && task.status.is_open() {
                load.total += 1;
                load.minutes += task.estimated_minutes;
                *load.per_type.entry(task.task_type.clone()).or_insert(0) += 1;
            }
        }
        load
    }

    /// Appends a feedback entry. Existing entries are never touched.
    pub fn add_feedback(&mut self, entry: FeedbackEntry) {
        self.feedbacks.push(entry);
    }

    /// All feedback from one staff member, in append order.
    #[must_use]
    pub fn feedback_for(&self, staff: &str) -> Vec<&FeedbackEntry> {
        self.feedbacks.iter().filter(|f| f.staff == staff).collect()
    }
}
