//! `wariate create-tasks` command.

use std::path::Path;

use chrono::NaiveDate;

use crate::alloc::{allocate, AllocationSummary, AssignmentRequest};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::ledger::{business_date, business_time, DailyLedger};
use crate::store::LedgerStore;
use crate::validate::check_ledger;

/// Execute the `create-tasks` command.
///
/// Validates the registry and the existing ledger, allocates the requested
/// work under the per-date lock, and writes the updated ledger atomically.
/// The printed summary lists created tasks per staff and the unassignable
/// remainder.
///
/// # Errors
///
/// Returns an error string on lock contention, validation failure, I/O
/// failure, or when not a single unit could be assigned.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    date: Option<NaiveDate>,
    tasks: &[String],
    plan: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let date = date.unwrap_or_else(|| business_date(ctx.clock.now()));

    let mut requests = Vec::new();
    for spec in tasks {
        requests.push(parse_inline_request(spec)?);
    }
    if let Some(plan_path) = plan {
        let contents = ctx
            .fs
            .read_to_string(plan_path)
            .map_err(|e| format!("Failed to read plan {}: {e}", plan_path.display()))?;
        let mut from_plan: Vec<AssignmentRequest> = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse plan {}: {e}", plan_path.display()))?;
        requests.append(&mut from_plan);
    }
    if requests.is_empty() {
        return Err("Nothing to allocate: pass --task or --plan.".to_string());
    }

    let store = LedgerStore::new(ctx, config);
    let registry = store.load_registry().map_err(|e| e.to_string())?;
    let registry_findings = registry.check();
    if !registry_findings.is_empty() {
        return Err(format!(
            "Registry failed validation:\n  {}",
            registry_findings.join("\n  ")
        ));
    }

    let _lock = store.lock_ledger(date).map_err(|e| e.to_string())?;
    let mut ledger =
        if store.ledger_exists(date) { store.load_ledger(date).map_err(|e| e.to_string())? } else { DailyLedger::new() };

    let findings = check_ledger(&ledger, date, Some(&registry));
    if !findings.is_empty() {
        return Err(format!("Ledger {date} failed validation:\n  {}", findings.join("\n  ")));
    }

    let created_at = business_time(ctx.clock.now());
    let summary = allocate(&mut ledger, date, &registry, &requests, created_at);

    if summary.created_total() > 0 {
        let findings = check_ledger(&ledger, date, Some(&registry));
        if !findings.is_empty() {
            return Err(format!(
                "Allocation produced an invalid ledger; nothing was written:\n  {}",
                findings.join("\n  ")
            ));
        }
        store.save_ledger(date, &ledger).map_err(|e| e.to_string())?;
    }

    if json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to render summary: {e}"))?;
        println!("{rendered}");
    } else {
        println!("{}", format_summary(date, &summary));
    }

    if summary.created_total() == 0 {
        return Err("No tasks could be assigned.".to_string());
    }
    Ok(())
}

/// Parses `TYPE:COUNT[:PRIORITY]` into a request with default description
/// and per-assignee estimated minutes.
fn parse_inline_request(spec: &str) -> Result<AssignmentRequest, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("Invalid --task {spec}: expected TYPE:COUNT[:PRIORITY]"));
    }
    let task_type = parts[0].trim();
    if task_type.is_empty() {
        return Err(format!("Invalid --task {spec}: empty task type"));
    }
    let count: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("Invalid --task {spec}: count must be a number"))?;
    let priority = match parts.get(2) {
        Some(p) => p.trim().parse()?,
        None => crate::ledger::Priority::default(),
    };
    Ok(AssignmentRequest {
        task_type: task_type.to_string(),
        count,
        description: None,
        priority,
        estimated_minutes: None,
    })
}

fn format_summary(date: NaiveDate, summary: &AllocationSummary) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Created {} task(s) for {date}.", summary.created_total()));
    for (staff, ids) in &summary.created {
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        lines.push(format!("  {staff}: {} ({})", ids.len(), rendered.join(", ")));
    }
    if !summary.unassigned.is_empty() {
        lines.push("Unassignable remainder:".to_string());
        for remainder in &summary.unassigned {
            lines.push(format!("  {}: {} unit(s)", remainder.task_type, remainder.count));
        }
    }
    lines.join("\n")
}
