//! Command dispatch and handlers.

pub mod add_feedback;
pub mod archive;
pub mod create_tasks;
pub mod set_status;
pub mod show;
pub mod validate;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler using the live context and the
/// environment-derived configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = ServiceContext::live();
    let config = Config::from_env();
    dispatch_with(&ctx, &config, command)
}

/// Dispatch a command with explicit context and configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with(
    ctx: &ServiceContext,
    config: &Config,
    command: &Command,
) -> Result<(), String> {
    match command {
        Command::CreateTasks { date, tasks, plan, json } => {
            create_tasks::run(ctx, config, *date, tasks, plan.as_deref(), *json)
        }
        Command::AddFeedback { staff, content, date } => {
            add_feedback::run(ctx, config, staff, content, *date)
        }
        Command::SetStatus { task_id, status } => set_status::run(ctx, config, *task_id, *status),
        Command::Show { date } => show::run(ctx, config, *date),
        Command::Archive { days, dry_run } => archive::run(ctx, config, *days, *dry_run),
        Command::Validate { paths, all, json } => validate::run(ctx, config, paths, *all, *json),
    }
}
