//! Structural and semantic validation of registry and ledger files.
//!
//! Runs before any component consumes a file (pre-flight) and as the
//! standalone `validate` command (audit). Never mutates anything: the
//! result is a per-file report of findings, empty when the file is sound.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::ledger::DailyLedger;
use crate::registry::SkillRegistry;

/// Which schema a file is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// The skill registry file.
    Registry,
    /// A daily task ledger file.
    Ledger,
}

impl SchemaKind {
    /// Guesses the schema from the file name: an ISO-date stem means a
    /// ledger, anything else the registry.
    #[must_use]
    pub fn infer(path: &Path) -> Self {
        let is_date = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.parse::<NaiveDate>().is_ok());
        if is_date {
            Self::Ledger
        } else {
            Self::Registry
        }
    }
}

/// Validation outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The file that was checked.
    pub path: PathBuf,
    /// Everything wrong with it; empty means the file passed.
    pub findings: Vec<String>,
}

impl FileReport {
    /// Returns `true` when no findings were recorded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Semantic findings for an in-memory ledger belonging to `date`.
///
/// Covers identifier shape and ordering, the date-ownership rule, assignee
/// resolution, and the per-staff capacity invariant. Reference and capacity
/// checks need the registry; with `None` only the ledger-local rules run.
#[must_use]
pub fn check_ledger(
    ledger: &DailyLedger,
    date: NaiveDate,
    registry: Option<&SkillRegistry>,
) -> Vec<String> {
    let mut findings = Vec::new();

    let mut last_seq: Option<u32> = None;
    for task in &ledger.tasks {
        if task.id.date() != date {
            findings.push(format!("task {}: id does not belong to ledger date {date}", task.id));
        }
        if let Some(prev) = last_seq {
            if task.id.seq() <= prev {
                findings.push(format!(
                    "task {}: sequence number must increase (previous was {prev:03})",
                    task.id
                ));
            }
        }
        last_seq = Some(task.id.seq());

        if let (Some(reg), Some(assignee)) = (registry, task.assigned_to.as_deref()) {
            match reg.get(assignee) {
                Err(_) => {
                    findings.push(format!("task {}: assigned to unknown staff {assignee}", task.id));
                }
                Ok(staff) => {
                    if !staff.skills.contains_key(&task.task_type) {
                        findings.push(format!(
                            "task {}: staff {assignee} has no skill entry for {}",
                            task.id, task.task_type
                        ));
                    }
                }
            }
        }
    }

    if let Some(reg) = registry {
        let assignees: BTreeSet<&str> =
            ledger.tasks.iter().filter_map(|t| t.assigned_to.as_deref()).collect();
        for key in assignees {
            let Ok(staff) = reg.get(key) else {
                continue; // already reported per task
            };
            let load = ledger.staff_load(key);
            for (task_type, count) in load.per_type() {
                let Some(profile) = staff.skills.get(task_type) else {
                    continue; // already reported per task
                };
                if count > profile.tasks_per_day {
                    findings.push(format!(
                        "staff {key}: {count} open {task_type} tasks exceed the daily capacity \
                         of {}",
                        profile.tasks_per_day
                    ));
                }
            }
            if let Some(max) = staff.constraints.max_tasks_per_day {
                if load.total > max {
                    findings.push(format!(
                        "staff {key}: {} open tasks exceed max_tasks_per_day {max}",
                        load.total
                    ));
                }
                let budget = f64::from(max) * staff.average_time_per_task();
                if f64::from(load.minutes) > budget {
                    findings.push(format!(
                        "staff {key}: {} open minutes exceed the {budget:.0}-minute budget",
                        load.minutes
                    ));
                }
            }
        }
    }

    findings
}

/// Validates the registry file at `path`.
pub fn validate_registry_file(ctx: &ServiceContext, path: &Path) -> FileReport {
    let mut report = FileReport { path: path.to_path_buf(), findings: Vec::new() };
    let contents = match ctx.fs.read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            report.findings.push(format!("cannot read: {e}"));
            return report;
        }
    };
    match serde_yaml::from_str::<SkillRegistry>(&contents) {
        Ok(registry) => report.findings.extend(registry.check()),
        Err(e) => report.findings.push(format!("does not match the registry schema: {e}")),
    }
    report
}

/// Validates the ledger file at `path`.
///
/// The owning date comes from the file name; reference and capacity checks
/// run only when a registry is supplied.
pub fn validate_ledger_file(
    ctx: &ServiceContext,
    path: &Path,
    registry: Option<&SkillRegistry>,
) -> FileReport {
    let mut report = FileReport { path: path.to_path_buf(), findings: Vec::new() };
    let Some(date) = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.parse::<NaiveDate>().ok())
    else {
        report.findings.push("file name is not an ISO date".to_string());
        return report;
    };
    let contents = match ctx.fs.read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            report.findings.push(format!("cannot read: {e}"));
            return report;
        }
    };
    match serde_yaml::from_str::<DailyLedger>(&contents) {
        Ok(ledger) => report.findings.extend(check_ledger(&ledger, date, registry)),
        Err(e) => report.findings.push(format!("does not match the ledger schema: {e}")),
    }
    report
}

/// Validates `path` against the schema inferred from its name.
pub fn validate_path(
    ctx: &ServiceContext,
    path: &Path,
    registry: Option<&SkillRegistry>,
) -> FileReport {
    match SchemaKind::infer(path) {
        SchemaKind::Registry => validate_registry_file(ctx, path),
        SchemaKind::Ledger => validate_ledger_file(ctx, path, registry),
    }
}

/// Formats reports as a human-readable pass/fail listing.
#[must_use]
pub fn format_reports(reports: &[FileReport]) -> String {
    let mut lines = Vec::new();
    for report in reports {
        let status = if report.passed() { "PASS" } else { "FAIL" };
        lines.push(format!("[{status}] {}", report.path.display()));
        for finding in &report.findings {
            lines.push(format!("       {finding}"));
        }
    }
    let passed = reports.iter().filter(|r| r.passed()).count();
    lines.push(String::new());
    lines.push(format!("Result: {passed}/{} file(s) passed", reports.len()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{FeedbackEntry, Priority, Task, TaskStatus};
    use crate::registry::{Constraints, SkillProfile, Staff};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn task(id: &str, task_type: &str, assigned_to: Option<&str>) -> Task {
        Task {
            id: id.parse().unwrap(),
            task_type: task_type.to_string(),
            description: "unit".to_string(),
            assigned_to: assigned_to.map(String::from),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            estimated_minutes: 15,
            created_at: "2025-11-19T09:00:00+09:00".parse().unwrap(),
        }
    }

    fn registry() -> SkillRegistry {
        let mut reg = SkillRegistry::new();
        reg.add_staff(
            "aiko",
            Staff {
                full_name: "Aiko".to_string(),
                nickname: None,
                skills: [(
                    "査定".to_string(),
                    SkillProfile { time_per_task: 15, tasks_per_day: 2 },
                )]
                .into_iter()
                .collect(),
                constraints: Constraints::default(),
                notes: None,
            },
        )
        .unwrap();
        reg
    }

    #[test]
    fn clean_ledger_has_no_findings() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-001", "査定", Some("aiko")));
        ledger.append(task("T20251119-002", "査定", Some("aiko")));
        ledger.add_feedback(FeedbackEntry {
            staff: "aiko".to_string(),
            timestamp: "2025-11-19T18:00:00+09:00".parse().unwrap(),
            content: "ok".to_string(),
        });

        let findings = check_ledger(&ledger, date("2025-11-19"), Some(&registry()));
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn non_increasing_sequence_is_flagged() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-002", "査定", None));
        ledger.append(task("T20251119-002", "査定", None));
        ledger.append(task("T20251119-001", "査定", None));

        let findings = check_ledger(&ledger, date("2025-11-19"), None);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.contains("sequence number")));
    }

    #[test]
    fn foreign_date_id_is_flagged() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251118-001", "査定", None));

        let findings = check_ledger(&ledger, date("2025-11-19"), None);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("does not belong"));
    }

    #[test]
    fn unknown_assignee_and_missing_skill_are_flagged() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-001", "査定", Some("nobody")));
        ledger.append(task("T20251119-002", "清掃", Some("aiko")));

        let findings = check_ledger(&ledger, date("2025-11-19"), Some(&registry()));
        assert!(findings.iter().any(|f| f.contains("unknown staff nobody")));
        assert!(findings.iter().any(|f| f.contains("no skill entry for 清掃")));
    }

    #[test]
    fn over_capacity_ledger_is_flagged() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-001", "査定", Some("aiko")));
        ledger.append(task("T20251119-002", "査定", Some("aiko")));
        ledger.append(task("T20251119-003", "査定", Some("aiko")));

        let findings = check_ledger(&ledger, date("2025-11-19"), Some(&registry()));
        assert!(findings.iter().any(|f| f.contains("exceed the daily capacity")));
    }

    #[test]
    fn closed_tasks_do_not_count_against_capacity() {
        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-001", "査定", Some("aiko")));
        ledger.append(task("T20251119-002", "査定", Some("aiko")));
        let mut third = task("T20251119-003", "査定", Some("aiko"));
        third.status = TaskStatus::Done;
        ledger.append(third);

        let findings = check_ledger(&ledger, date("2025-11-19"), Some(&registry()));
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn schema_kind_infers_from_file_name() {
        assert_eq!(SchemaKind::infer(Path::new("data/daily/2025-11-19.yaml")), SchemaKind::Ledger);
        assert_eq!(SchemaKind::infer(Path::new("data/staff.yaml")), SchemaKind::Registry);
    }

    #[test]
    fn registry_file_with_unknown_field_fails() {
        let dir = std::env::temp_dir().join("wariate_validate_registry_file");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("staff.yaml");
        std::fs::write(&path, "aiko:\n  full_name: Aiko\n  skills: {}\n  shoe_size: 24\n").unwrap();

        let ctx = ServiceContext::live();
        let report = validate_registry_file(&ctx, &path);
        assert!(!report.passed());
        assert!(report.findings[0].contains("registry schema"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn ledger_file_round_trip_passes() {
        let dir = std::env::temp_dir().join("wariate_validate_ledger_file");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut ledger = DailyLedger::new();
        ledger.append(task("T20251119-001", "査定", Some("aiko")));
        let path = dir.join("2025-11-19.yaml");
        std::fs::write(&path, serde_yaml::to_string(&ledger).unwrap()).unwrap();

        let ctx = ServiceContext::live();
        let report = validate_ledger_file(&ctx, &path, Some(&registry()));
        assert!(report.passed(), "{:?}", report.findings);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn format_reports_shows_pass_and_fail() {
        let reports = vec![
            FileReport { path: PathBuf::from("a.yaml"), findings: Vec::new() },
            FileReport { path: PathBuf::from("b.yaml"), findings: vec!["broken".to_string()] },
        ];
        let text = format_reports(&reports);
        assert!(text.contains("[PASS] a.yaml"));
        assert!(text.contains("[FAIL] b.yaml"));
        assert!(text.contains("broken"));
        assert!(text.contains("Result: 1/2 file(s) passed"));
    }
}
