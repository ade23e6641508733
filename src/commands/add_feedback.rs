//! `wariate add-feedback` command.

use chrono::NaiveDate;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::ledger::{business_date, business_time, FeedbackEntry};
use crate::store::LedgerStore;

/// Execute the `add-feedback` command.
///
/// Appends a note to the date's ledger and prints the author's full
/// history for that date. The ledger must already exist — feedback never
/// creates one.
///
/// # Errors
///
/// Returns an error string when the ledger is absent, the lock cannot be
/// acquired, or the write fails.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    staff: &str,
    content: &str,
    date: Option<NaiveDate>,
) -> Result<(), String> {
    let date = date.unwrap_or_else(|| business_date(ctx.clock.now()));
    let store = LedgerStore::new(ctx, config);

    let _lock = store.lock_ledger(date).map_err(|e| e.to_string())?;
    let mut ledger = store.load_ledger(date).map_err(|e| e.to_string())?;

    ledger.add_feedback(FeedbackEntry {
        staff: staff.to_string(),
        timestamp: business_time(ctx.clock.now()),
        content: content.to_string(),
    });
    store.save_ledger(date, &ledger).map_err(|e| e.to_string())?;

    let history = ledger.feedback_for(staff);
    println!("Recorded feedback from {staff} on {date}.");
    println!("History for {staff} ({} entr{}):", history.len(), plural_y(history.len()));
    for entry in history {
        println!("  [{}] {}", entry.timestamp.format("%H:%M"), entry.content);
    }
    Ok(())
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
