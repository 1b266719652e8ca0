//! Task collection state and its mutations.

use tasklist_core::id::TaskId;
use tasklist_core::{Filter, Task, ValidationError, validate_text};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::persistence::{self, Storage};
use crate::view::StoreSnapshot;

/// Errors surfaced by [`TaskStore`] operations. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The text was empty or too long.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No task has the given id.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Owner of the ordered task collection and the current filter.
///
/// Every successful mutation writes the whole collection back to storage.
/// A failed write keeps the in-memory state authoritative and marks the
/// store as non-durable until the next successful write.
#[derive(Debug)]
pub struct TaskStore<S> {
    storage: S,
    tasks: Vec<Task>,
    filter: Filter,
    durable: bool,
}

impl<S: Storage> TaskStore<S> {
    /// Load the collection from `storage` and start with the `All` filter.
    pub fn open(storage: S) -> Self {
        let tasks = persistence::load(&storage);
        Self {
            storage,
            tasks,
            filter: Filter::All,
            durable: true,
        }
    }

    /// Add a task at the end of the collection.
    ///
    /// # Errors
    /// Returns [`TaskError::Validation`] for blank or over-long text.
    pub fn add(&mut self, text: &str) -> Result<Task, TaskError> {
        let text = validate_text(text)?;
        let now = OffsetDateTime::now_utc();
        let taken: Vec<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        let task = Task::new(TaskId::generate(now, &taken), text, now);
        debug!(task = %task.id, "Added task");
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    /// Remove a task. Unknown ids are ignored and reported as `false`.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.tasks.remove(index);
        debug!(task = %id, "Deleted task");
        self.persist();
        true
    }

    /// Flip a task between active and completed.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] if the id is unknown.
    pub fn toggle(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let task = self.find_mut(id)?;
        task.toggle(OffsetDateTime::now_utc());
        let task = task.clone();
        debug!(task = %id, completed = task.completed, "Toggled task");
        self.persist();
        Ok(task)
    }

    /// Replace a task's text.
    ///
    /// Blank input leaves the task untouched and is not an error.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids and
    /// [`TaskError::Validation`] for over-long text.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<Task, TaskError> {
        let task = self.find_mut(id)?;
        let text = match validate_text(new_text) {
            Ok(text) => text,
            Err(ValidationError::Empty) => return Ok(task.clone()),
            Err(err) => return Err(err.into()),
        };
        if task.text == text {
            return Ok(task.clone());
        }
        task.text = text;
        let task = task.clone();
        debug!(task = %id, "Edited task");
        self.persist();
        Ok(task)
    }

    /// Remove every completed task and return how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let completed = self.completed_count();
        if completed == 0 {
            return 0;
        }
        self.tasks.retain(|task| !task.completed);
        debug!(removed = completed, "Cleared completed tasks");
        self.persist();
        completed
    }

    /// Write the collection to storage, recording whether it succeeded.
    pub fn persist(&mut self) -> bool {
        self.durable = persistence::save(&self.storage, &self.tasks);
        self.durable
    }
}

impl<S> TaskStore<S> {
    /// Change the current filter. Never persisted.
    pub const fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Change the filter by name; unknown names select [`Filter::All`].
    pub fn set_filter_str(&mut self, raw: &str) -> Filter {
        let filter = Filter::parse_or_default(raw);
        self.set_filter(filter);
        filter
    }

    /// Current filter.
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Tasks passing the current filter, in collection order.
    pub fn filtered(&self) -> Vec<&Task> {
        self.filtered_by(self.filter)
    }

    /// Tasks passing `filter`, in collection order.
    pub fn filtered_by(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    /// Number of tasks not yet completed.
    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    /// Number of completed tasks.
    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.remaining_count()
    }

    /// Whole collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Total number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// `false` while the latest write to storage failed.
    pub const fn is_durable(&self) -> bool {
        self.durable
    }

    /// Borrow the backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Immutable input for [`crate::view::render`].
    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot {
            filtered: self.filtered(),
            remaining: self.remaining_count(),
            filter: self.filter,
            total: self.tasks.len(),
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))
    }
}
