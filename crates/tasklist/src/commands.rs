//! One-shot subcommands that mutate or print the collection and exit.

use std::io::Write;

use anyhow::{Result, bail};
use tasklist_app::{Storage, TaskStore, render};
use tracing::warn;

use crate::Command;

/// Execute a non-interactive command against `store`, writing output to `out`.
pub fn run<S: Storage>(cmd: Command, store: &mut TaskStore<S>, out: &mut impl Write) -> Result<()> {
    match cmd {
        Command::Tui => bail!("the terminal UI is not a one-shot command"),
        Command::Add { text } => {
            let task = store.add(&text.join(" "))?;
            writeln!(out, "Added task {}", task.id)?;
        }
        Command::Ls { filter } => {
            store.set_filter_str(&filter);
            print_view(store, out)?;
        }
        Command::Toggle { id } => {
            let task = store.toggle(id)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            writeln!(out, "{verb} task {id}")?;
        }
        Command::Edit { id, text } => {
            let before = store.get(id).map(|task| task.text.clone());
            let task = store.edit(id, &text.join(" "))?;
            if before.as_deref() == Some(task.text.as_str()) {
                writeln!(out, "Task {id} left unchanged")?;
            } else {
                writeln!(out, "Updated task {id}")?;
            }
        }
        Command::Rm { id } => {
            if !store.delete(id) {
                bail!("task {id} not found");
            }
            writeln!(out, "Deleted task {id}")?;
        }
        Command::ClearCompleted => {
            let count = store.completed_count();
            if count == 0 {
                writeln!(out, "No completed tasks to clear")?;
            } else {
                let removed = store.clear_completed();
                let noun = if removed == 1 { "task" } else { "tasks" };
                writeln!(out, "Cleared {removed} completed {noun}")?;
            }
        }
    }

    if !store.is_durable() {
        warn!("Changes could not be saved; they will be lost on exit");
    }
    Ok(())
}

fn print_view<S>(store: &TaskStore<S>, out: &mut impl Write) -> Result<()> {
    let view = render(&store.snapshot());
    if let Some(message) = &view.empty_state {
        writeln!(out, "{message}")?;
    }
    for row in &view.rows {
        let mark = if row.completed { 'x' } else { ' ' };
        writeln!(out, "[{mark}] {}  {}", row.id, row.text)?;
    }
    writeln!(out, "{}", view.summary)?;
    Ok(())
}
