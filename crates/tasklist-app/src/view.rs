//! Pure projection from store state to what a UI draws.

use tasklist_core::id::TaskId;
use tasklist_core::{Filter, Task, unescape};

/// Message shown when the collection itself is empty.
pub const EMPTY_COLLECTION_MESSAGE: &str = "No tasks yet. Add one above!";

/// Immutable store state consumed by [`render`].
#[derive(Debug, Clone)]
pub struct StoreSnapshot<'a> {
    /// Tasks passing the current filter, in collection order.
    pub filtered: Vec<&'a Task>,
    /// Count of tasks not yet completed.
    pub remaining: usize,
    /// Current filter.
    pub filter: Filter,
    /// Size of the whole collection.
    pub total: usize,
}

/// User actions a row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Flip completion.
    Toggle,
    /// Change the text.
    Edit,
    /// Remove the task.
    Delete,
}

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Task the row belongs to.
    pub id: TaskId,
    /// Text as the user typed it (entities decoded).
    pub text: String,
    /// Completion flag, drives strike-through styling.
    pub completed: bool,
    /// Actions available on the row.
    pub affordances: [Affordance; 3],
}

impl RowView {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: unescape(&task.text).into_owned(),
            completed: task.completed,
            affordances: [Affordance::Toggle, Affordance::Edit, Affordance::Delete],
        }
    }
}

/// Everything needed to draw the list, its summary and the empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Rows for the filtered tasks.
    pub rows: Vec<RowView>,
    /// Pluralized remaining-count line.
    pub summary: String,
    /// Message shown instead of rows, if there are none.
    pub empty_state: Option<String>,
    /// Filter the rows were selected with.
    pub filter: Filter,
    /// Size of the whole collection.
    pub total: usize,
    /// Completed tasks in the whole collection.
    pub completed: usize,
}

/// Project a snapshot into a [`ViewModel`]. Calling it twice on the same state
/// gives equal results.
#[must_use]
pub fn render(snapshot: &StoreSnapshot<'_>) -> ViewModel {
    let rows: Vec<RowView> = snapshot
        .filtered
        .iter()
        .map(|task| RowView::from_task(task))
        .collect();
    let empty_state = rows
        .is_empty()
        .then(|| empty_state_message(snapshot.filter, snapshot.total).to_owned());

    ViewModel {
        rows,
        summary: remaining_summary(snapshot.remaining),
        empty_state,
        filter: snapshot.filter,
        total: snapshot.total,
        completed: snapshot.total - snapshot.remaining,
    }
}

/// `"1 task remaining"` / `"N tasks remaining"`.
#[must_use]
pub fn remaining_summary(remaining: usize) -> String {
    format!("{remaining} {} remaining", plural_task(remaining))
}

/// Confirmation question before clearing completed tasks.
#[must_use]
pub fn clear_completed_prompt(count: usize) -> String {
    format!("Delete {count} completed {}?", plural_task(count))
}

/// Empty-state text: distinguishes an empty collection from a filter that hides everything.
#[must_use]
pub const fn empty_state_message(filter: Filter, total: usize) -> &'static str {
    if total == 0 {
        return EMPTY_COLLECTION_MESSAGE;
    }
    match filter {
        Filter::All => EMPTY_COLLECTION_MESSAGE,
        Filter::Active => "No active tasks. Everything is done!",
        Filter::Completed => "No completed tasks yet.",
    }
}

const fn plural_task(count: usize) -> &'static str {
    if count == 1 { "task" } else { "tasks" }
}
