use crate::cli::{Command, TrashCommand};
use soft_delete_core::prelude::*;
use soft_delete_core::{format_ledger_datetime, sanitize_user_path};
use std::error::Error;

const PROG: &str = "soft-delete";

/// Runs one command against the store and renders its outcome.
pub fn run<F: FileSystem>(store: &QuarantineStore<F>, trash: &dyn SystemTrash, command: Command) -> CommandOutput {
    match command {
        Command::Delete { path } => match store.quarantine(&path) {
            Ok(name) => CommandOutput::success(Operation::Quarantine, vec![format!("Deleted {name}")]),
            Err(err) => failure(Operation::Quarantine, &err),
        },
        Command::Recover { name } => match store.restore(&name) {
            Ok(original) => CommandOutput::success(
                Operation::Restore,
                vec![format!("Recovered {name} to {}", sanitize_user_path(&original))],
            ),
            Err(err) => failure(Operation::Restore, &err),
        },
        Command::List { search } => match store.list(search.as_deref()) {
            Ok(listing) => CommandOutput::success(Operation::List, render_listing(&listing)),
            Err(err) => failure(Operation::List, &err),
        },
        Command::History => match store.history() {
            Ok(history) => CommandOutput::success(Operation::History, render_history(&history)),
            Err(err) => failure(Operation::History, &err),
        },
        Command::Check => match store.verify() {
            Ok(report) if report.is_consistent() => CommandOutput::success(
                Operation::Verify,
                vec!["Delete log matches the holding directory".to_string()],
            ),
            Ok(report) => {
                let mut problems = Vec::new();
                for name in &report.missing_from_holding {
                    problems.push(format!("{PROG}: {name}: logged but missing from the holding directory"));
                }
                for name in &report.untracked_in_holding {
                    problems.push(format!("{PROG}: {name}: in the holding directory but not logged"));
                }
                CommandOutput::warning(Operation::Verify, Vec::new(), problems)
            }
            Err(err) => failure(Operation::Verify, &err),
        },
        Command::Trash(sub) => run_trash(trash, sub),
    }
}

fn run_trash(trash: &dyn SystemTrash, command: TrashCommand) -> CommandOutput {
    if !trash.is_available() {
        return CommandOutput::warning(
            Operation::SystemTrash,
            Vec::new(),
            vec![format!("{PROG}: system trash is not available in this build")],
        );
    }
    match command {
        TrashCommand::List => match trash.list() {
            Ok(items) => CommandOutput::success(
                Operation::SystemTrash,
                items
                    .iter()
                    .map(|item| format!("{}\t{}", item.name, sanitize_user_path(&item.original_path)))
                    .collect::<Vec<_>>(),
            ),
            Err(err) => failure(Operation::SystemTrash, &err),
        },
        TrashCommand::Restore { original_path } => match trash.restore(&original_path) {
            Ok(()) => CommandOutput::success(
                Operation::SystemTrash,
                vec![format!("Recovered {}", sanitize_user_path(&original_path))],
            ),
            Err(err) => failure(Operation::SystemTrash, &err),
        },
    }
}

fn render_listing(listing: &Listing) -> Vec<String> {
    let mut lines = vec!["Deleted Files:".to_string()];
    lines.extend(listing.holding.iter().map(|name| format!("  {name}")));
    lines.push("Recovered Files:".to_string());
    lines.extend(listing.recovered.iter().map(|name| format!("  {name}")));
    lines
}

fn render_history(history: &[HistoryEntry]) -> Vec<String> {
    history
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}",
                format_ledger_datetime(&entry.restored_at),
                entry.name,
                sanitize_user_path(&entry.original_path)
            )
        })
        .collect()
}

fn failure(command: Operation, err: &CoreError) -> CommandOutput {
    let mut message = format!("{PROG}: {command}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    tracing::debug!(kind = %err.kind(), "{message}");
    CommandOutput::with_error(command, message)
}
