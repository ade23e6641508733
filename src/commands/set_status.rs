//! `wariate set-status` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::ledger::{TaskId, TaskStatus};
use crate::store::LedgerStore;

/// Execute the `set-status` command.
///
/// The owning date comes from the identifier itself. The lifecycle only
/// moves forward; a rejected transition leaves the ledger file untouched.
///
/// # Errors
///
/// Returns an error string for an unknown task or ledger, an illegal
/// transition, lock contention, or a failed write.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    task_id: TaskId,
    status: TaskStatus,
) -> Result<(), String> {
    let date = task_id.date();
    let store = LedgerStore::new(ctx, config);

    let _lock = store.lock_ledger(date).map_err(|e| e.to_string())?;
    let mut ledger = store.load_ledger(date).map_err(|e| e.to_string())?;

    ledger.update_status(task_id, status).map_err(|e| e.to_string())?;
    store.save_ledger(date, &ledger).map_err(|e| e.to_string())?;

    println!("{task_id} is now {status}.");
    Ok(())
}
