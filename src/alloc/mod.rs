//! Capacity-aware task allocation.
//!
//! Takes a morning work plan (task type + unit count per request), the
//! skill registry, and the target date's ledger, and places one unit at a
//! time on the least-loaded eligible staff member. Units nobody can take
//! land in the unassignable remainder of the summary — the signal operators
//! act on — and are never silently dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::{DailyLedger, Priority, Task, TaskId, TaskStatus};
use crate::registry::{SkillRegistry, Staff};

/// One line of a work plan: how many units of one task type to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentRequest {
    /// Task type; staff without a skill entry for it are ineligible.
    #[serde(rename = "type")]
    pub task_type: String,
    /// How many units of work to create.
    pub count: u32,
    /// Description template; `{n}` expands to the unit number. Defaults to
    /// `<type> #<n>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Urgency of every created unit.
    #[serde(default)]
    pub priority: Priority,
    /// Minutes per unit. Defaults to the assignee's `time_per_task`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

/// A portion of a request that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remainder {
    /// The task type that ran out of takers.
    #[serde(rename = "type")]
    pub task_type: String,
    /// How many units went unplaced.
    pub count: u32,
}

/// What an allocation run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationSummary {
    /// Identifiers of created tasks, keyed by assignee.
    pub created: BTreeMap<String, Vec<TaskId>>,
    /// Units that no eligible staff had capacity for.
    pub unassigned: Vec<Remainder>,
}

impl AllocationSummary {
    /// Total number of tasks created across all staff.
    #[must_use]
    pub fn created_total(&self) -> usize {
        self.created.values().map(Vec::len).sum()
    }

    /// Total number of units left unassigned.
    #[must_use]
    pub fn unassigned_total(&self) -> u32 {
        self.unassigned.iter().map(|r| r.count).sum()
    }
}

/// Places the requested work onto the ledger.
///
/// Requests are processed in the order given. Within one request, each unit
/// goes to the first candidate in a deterministic ranking: open-task load
/// ascending, staff who prefer the task type first, then staff key — so
/// repeated runs over the same inputs produce identical ledgers, and work
/// spreads round-robin as loads even out. A unit nobody can take closes out
/// the request into the remainder; an unknown task type or an empty
/// eligible set yields the whole count as remainder. Never fails: capacity
/// exhaustion is an outcome, not an error.
pub fn allocate(
    ledger: &mut DailyLedger,
    date: NaiveDate,
    registry: &SkillRegistry,
    requests: &[AssignmentRequest],
    created_at: DateTime<FixedOffset>,
) -> AllocationSummary {
    let mut summary = AllocationSummary::default();

    for request in requests {
        let eligible: Vec<(&str, &Staff)> = registry
            .iter()
            .filter(|(_, s)| s.skills.contains_key(&request.task_type))
            .map(|(k, s)| (k.as_str(), s))
            .collect();

        if eligible.is_empty() {
            if request.count > 0 {
                summary
                    .unassigned
                    .push(Remainder { task_type: request.task_type.clone(), count: request.count });
            }
            continue;
        }

        let mut placed: u32 = 0;
        for unit in 1..=request.count {
            let mut ranked = eligible.clone();
            ranked.sort_by_key(|(key, staff)| {
                (
                    ledger.staff_load(key).total,
                    !staff.prefers(&request.task_type),
                    (*key).to_string(),
                )
            });

            let id = ledger.next_id(date);
            let mut assignee = None;
            for (key, staff) in &ranked {
                let est = request
                    .estimated_minutes
                    .or_else(|| {
                        staff.skills.get(&request.task_type).map(|p| p.time_per_task)
                    })
                    .unwrap_or(0);
                let task = Task {
                    id,
                    task_type: request.task_type.clone(),
                    description: render_description(request, unit),
                    assigned_to: Some((*key).to_string()),
                    status: TaskStatus::Pending,
                    priority: request.priority,
                    estimated_minutes: est,
                    created_at,
                };
                // A rejected append means this candidate is at capacity;
                // the next one in the ranking gets a try.
                if ledger.append_assigned(task, registry).is_ok() {
                    assignee = Some(*key);
                    break;
                }
            }

            if let Some(key) = assignee {
                summary.created.entry(key.to_string()).or_default().push(id);
                placed += 1;
            } else {
                summary.unassigned.push(Remainder {
                    task_type: request.task_type.clone(),
                    count: request.count - placed,
                });
                break;
            }
        }
    }

    summary
}

fn render_description(request: &AssignmentRequest, unit: u32) -> String {
    request.description.as_ref().map_or_else(
        || format!("{} #{unit}", request.task_type),
        |template| template.replace("{n}", &unit.to_string()),
    )
}
