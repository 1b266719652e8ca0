//! User intents emitted by UI surfaces and their application to the store.

use tasklist_core::id::TaskId;
use tasklist_core::{Filter, Task};

use crate::persistence::Storage;
use crate::store::{TaskError, TaskStore};

/// A request coming from a UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a task with the given text.
    AddRequested(String),
    /// Flip a task's completion.
    ToggleRequested(TaskId),
    /// Replace a task's text.
    EditRequested {
        /// Task to edit.
        id: TaskId,
        /// New text as typed.
        text: String,
    },
    /// Remove a task.
    DeleteRequested(TaskId),
    /// Remove every completed task.
    ClearCompletedRequested,
    /// Switch the view filter.
    FilterRequested(Filter),
}

/// What applying an [`Intent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Task created.
    Added(Task),
    /// Task toggled; carries its new state.
    Toggled(Task),
    /// Task text after the edit (unchanged for blank input).
    Edited(Task),
    /// Whether a task was removed.
    Deleted(bool),
    /// Number of completed tasks removed.
    Cleared(usize),
    /// Filter now in effect.
    FilterChanged(Filter),
}

impl<S: Storage> TaskStore<S> {
    /// Dispatch an intent to the matching store operation.
    ///
    /// # Errors
    /// Propagates validation and not-found errors; state is unchanged in that case.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome, TaskError> {
        Ok(match intent {
            Intent::AddRequested(text) => Outcome::Added(self.add(&text)?),
            Intent::ToggleRequested(id) => Outcome::Toggled(self.toggle(id)?),
            Intent::EditRequested { id, text } => Outcome::Edited(self.edit(id, &text)?),
            Intent::DeleteRequested(id) => Outcome::Deleted(self.delete(id)),
            Intent::ClearCompletedRequested => Outcome::Cleared(self.clear_completed()),
            Intent::FilterRequested(filter) => {
                self.set_filter(filter);
                Outcome::FilterChanged(filter)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use tasklist_core::ValidationError;

    #[test]
    fn intents_drive_the_store() {
        let mut store = TaskStore::open(MemoryStorage::new());

        let Ok(Outcome::Added(task)) = store.apply(Intent::AddRequested("Buy milk".into())) else {
            panic!("add intent should create a task");
        };
        let Ok(Outcome::Toggled(toggled)) = store.apply(Intent::ToggleRequested(task.id)) else {
            panic!("toggle intent should succeed");
        };
        assert!(toggled.completed);

        assert_eq!(
            store.apply(Intent::FilterRequested(Filter::Active)),
            Ok(Outcome::FilterChanged(Filter::Active))
        );
        assert!(store.filtered().is_empty());

        assert_eq!(
            store.apply(Intent::ClearCompletedRequested),
            Ok(Outcome::Cleared(1))
        );
        assert_eq!(
            store.apply(Intent::DeleteRequested(task.id)),
            Ok(Outcome::Deleted(false))
        );
    }

    #[test]
    fn rejected_intents_leave_state_unchanged() {
        let mut store = TaskStore::open(MemoryStorage::new());
        assert_eq!(
            store.apply(Intent::AddRequested("  ".into())),
            Err(TaskError::Validation(ValidationError::Empty))
        );
        assert_eq!(
            store.apply(Intent::EditRequested {
                id: TaskId(3),
                text: "x".into()
            }),
            Err(TaskError::NotFound(TaskId(3)))
        );
        assert!(store.is_empty());
    }
}
