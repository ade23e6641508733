//! Skill registry — who can do which task types, and how fast.
//!
//! The registry file is a mapping of staff key to a staff record. It is
//! read-only from the allocator's point of view; only the maintenance
//! operations here mutate it, and each of them re-validates the whole
//! registry before committing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WariateError};
use crate::ledger::StaffLoad;

/// Throughput of one staff member for one task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillProfile {
    /// Minutes one unit of this task type takes this person. Must be positive.
    pub time_per_task: u32,
    /// How many units of this type they can take per day.
    pub tasks_per_day: u32,
}

/// Per-staff limits that cut across task types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    /// Cap on total open tasks per day, overriding the sum of skill capacities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tasks_per_day: Option<u32>,
    /// Task types this person should get first, in preference order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_task_types: Vec<String>,
}

/// One staff member's registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Staff {
    /// Display name.
    pub full_name: String,
    /// Optional short name used around the shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Task types this person can take, with their throughput for each.
    /// No entry for a type means ineligible for it.
    pub skills: BTreeMap<String, SkillProfile>,
    /// Cross-type limits and preferences.
    #[serde(default)]
    pub constraints: Constraints,
    /// Free-form operator notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Staff {
    /// Mean `time_per_task` across all of this person's skills, or zero for
    /// a record with no skills.
    #[must_use]
    pub fn average_time_per_task(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        let total: u32 = self.skills.values().map(|p| p.time_per_task).sum();
        f64::from(total) / self.skills.len() as f64
    }

    /// Whether this person lists `task_type` as preferred.
    #[must_use]
    pub fn prefers(&self, task_type: &str) -> bool {
        self.constraints.preferred_task_types.iter().any(|t| t == task_type)
    }

    /// Whether one more task of `task_type` taking `extra_minutes` fits
    /// within this person's capacity, given their current open load.
    ///
    /// Checks, in order: the per-type `tasks_per_day` cap, the global
    /// `max_tasks_per_day` count cap, and the minutes bound
    /// (`max_tasks_per_day x average time_per_task`). A missing skill entry
    /// means no capacity at all.
    #[must_use]
    pub fn within_capacity(&self, load: &StaffLoad, task_type: &str, extra_minutes: u32) -> bool {
        let Some(profile) = self.skills.get(task_type) else {
            return false;
        };
        if load.count_for(task_type) + 1 > profile.tasks_per_day {
            return false;
        }
        if let Some(max) = self.constraints.max_tasks_per_day {
            if load.total + 1 > max {
                return false;
            }
            let minutes = f64::from(load.minutes + extra_minutes);
            if minutes > f64::from(max) * self.average_time_per_task() {
                return false;
            }
        }
        true
    }
}

/// The whole registry: staff key mapped to staff record.
///
/// Serialized as a bare mapping, so the registry file reads as
/// `<key>: { full_name: ..., skills: ... }` per staff member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillRegistry {
    staff: BTreeMap<String, Staff>,
}

impl SkillRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates staff records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Staff)> {
        self.staff.iter()
    }

    /// Returns `true` if no staff are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    /// Looks up a staff record by key.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown key.
    pub fn get(&self, key: &str) -> Result<&Staff> {
        self.staff.get(key).ok_or_else(|| WariateError::not_found(format!("staff {key}")))
    }

    /// Returns the skill profile of `staff` for `task_type`, or `None` when
    /// they have no entry for it (ineligible).
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown staff key.
    pub fn capacity_for(&self, staff: &str, task_type: &str) -> Result<Option<&SkillProfile>> {
        Ok(self.get(staff)?.skills.get(task_type))
    }

    /// Returns the cross-type constraints of `staff`.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown staff key.
    pub fn constraints_for(&self, staff: &str) -> Result<&Constraints> {
        Ok(&self.get(staff)?.constraints)
    }

    /// Keys of all staff whose skills include `task_type`, in key order.
    #[must_use]
    pub fn eligible_staff(&self, task_type: &str) -> Vec<&str> {
        self.staff
            .iter()
            .filter(|(_, s)| s.skills.contains_key(task_type))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Semantic findings for the registry as a whole. Empty means valid.
    #[must_use]
    pub fn check(&self) -> Vec<String> {
        let mut findings = Vec::new();
        for (key, staff) in &self.staff {
            if key.trim().is_empty() {
                findings.push("staff key must not be empty".to_string());
            }
            if staff.full_name.trim().is_empty() {
                findings.push(format!("staff {key}: full_name must not be empty"));
            }
            for (task_type, profile) in &staff.skills {
                if profile.time_per_task == 0 {
                    findings
                        .push(format!("staff {key}: {task_type}: time_per_task must be positive"));
                }
            }
            for preferred in &staff.constraints.preferred_task_types {
                if !staff.skills.contains_key(preferred) {
                    findings.push(format!(
                        "staff {key}: preferred task type {preferred} has no skill entry"
                    ));
                }
            }
        }
        findings
    }

    /// Registers a new staff member.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::SchemaInvalid`] if the key is already taken
    /// or the resulting registry fails [`Self::check`]. The registry is
    /// unchanged on error.
    pub fn add_staff(&mut self, key: &str, staff: Staff) -> Result<()> {
        if self.staff.contains_key(key) {
            return Err(WariateError::SchemaInvalid {
                subject: "registry".to_string(),
                detail: format!("staff {key} is already registered"),
            });
        }
        let mut next = self.staff.clone();
        next.insert(key.to_string(), staff);
        self.commit(next)
    }

    /// Removes a staff member and returns their record.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown key.
    pub fn remove_staff(&mut self, key: &str) -> Result<Staff> {
        self.staff
            .remove(key)
            .ok_or_else(|| WariateError::not_found(format!("staff {key}")))
    }

    /// Sets (adds or replaces) one skill profile for a staff member.
    ///
    /// # Errors
    ///
    /// Returns [`WariateError::NotFound`] for an unknown staff key, or
    /// [`WariateError::SchemaInvalid`] if the resulting registry fails
    /// [`Self::check`]. The registry is unchanged on error.
    pub fn set_profile(&mut self, key: &str, task_type: &str, profile: SkillProfile) -> Result<()> {
        if !self.staff.contains_key(key) {
            return Err(WariateError::not_found(format!("staff {key}")));
        }
        let mut next = self.staff.clone();
        if let Some(staff) = next.get_mut(key) {
            staff.skills.insert(task_type.to_string(), profile);
        }
        self.commit(next)
    }

    // Replaces the staff map only if the candidate passes check().
    fn commit(&mut self, next: BTreeMap<String, Staff>) -> Result<()> {
        let candidate = Self { staff: next };
        let findings = candidate.check();
        if findings.is_empty() {
            *self = candidate;
            Ok(())
        } else {
            Err(WariateError::SchemaInvalid {
                subject: "registry".to_string(),
                detail: findings.join("; "),
            })
        }
    }
}
