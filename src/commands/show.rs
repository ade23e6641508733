//! `wariate show` command.

use chrono::NaiveDate;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::ledger::business_date;
use crate::store::LedgerStore;

/// Execute the `show` command.
///
/// Displays the day's tasks as a table, followed by the feedback log.
/// A date without a ledger is reported, not an error.
///
/// # Errors
///
/// Returns an error string if an existing ledger cannot be read or parsed.
pub fn run(ctx: &ServiceContext, config: &Config, date: Option<NaiveDate>) -> Result<(), String> {
    let date = date.unwrap_or_else(|| business_date(ctx.clock.now()));
    let store = LedgerStore::new(ctx, config);

    if !store.ledger_exists(date) {
        println!("No ledger for {date}.");
        return Ok(());
    }
    let ledger = store.load_ledger(date).map_err(|e| e.to_string())?;

    println!("Ledger {date}: {} task(s)", ledger.tasks.len());
    if !ledger.tasks.is_empty() {
        let rows: Vec<(String, String, String, String, String)> = ledger
            .tasks
            .iter()
            .map(|t| {
                (
                    t.id.to_string(),
                    t.task_type.clone(),
                    t.assigned_to.clone().unwrap_or_else(|| "-".to_string()),
                    t.status.to_string(),
                    t.priority.to_string(),
                )
            })
            .collect();

        let id_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(2).max(2);
        let type_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(4).max(4);
        let staff_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(5).max(5);
        let status_width = rows.iter().map(|r| r.3.len()).max().unwrap_or(6).max(6);

        println!(
            "{:<id_width$}  {:<type_width$}  {:<staff_width$}  {:<status_width$}  PRIORITY",
            "ID", "TYPE", "STAFF", "STATUS",
        );
        for (id, task_type, staff, status, priority) in &rows {
            println!(
                "{id:<id_width$}  {task_type:<type_width$}  {staff:<staff_width$}  \
                 {status:<status_width$}  {priority}",
            );
        }
    }

    if !ledger.feedbacks.is_empty() {
        println!("\nFeedback:");
        for entry in &ledger.feedbacks {
            println!("  [{}] {}: {}", entry.timestamp.format("%H:%M"), entry.staff, entry.content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_without_ledger_is_ok() {
        let dir = std::env::temp_dir().join("wariate_cmd_show_empty");
        let _ = std::fs::remove_dir_all(&dir);
        let ctx = ServiceContext::live();
        let config = Config::rooted_at(dir);

        let result = run(&ctx, &config, Some("2025-11-19".parse().unwrap()));

        assert!(result.is_ok());
        let _ = std::fs::remove_dir_all(&config.data_root);
    }
}
