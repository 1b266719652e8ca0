use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
};
use tasklist_app::{Intent, Outcome, Storage, TaskStore, UiConfig, ViewModel, render};
use tasklist_core::id::TaskId;

use super::constants::{
    FILTER_BAR_HEIGHT, INPUT_HEIGHT, LIST_MIN_HEIGHT, NOT_SAVED_WARNING, STATUS_HEIGHT,
    SUMMARY_HEIGHT,
};
use super::widgets::filter_bar::draw_filter_bar;
use super::widgets::status::draw_summary;

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    /// Moving through the list.
    Browse,
    /// Typing a new task.
    Adding,
    /// Typing replacement text for a task.
    Editing(TaskId),
    /// Waiting for y/n before clearing this many completed tasks.
    ConfirmClear(usize),
}

pub(super) struct Ui<S: Storage> {
    pub(super) store: TaskStore<S>,
    pub(super) settings: UiConfig,
    pub(super) mode: Mode,
    pub(super) input: String,
    /// Index into the filtered rows.
    pub(super) selected: usize,
    pub(super) message: Option<Message>,
    /// Set when the session started without a durable slot.
    pub(super) storage_warning: Option<String>,
    pub(super) should_quit: bool,
}

impl<S: Storage> Ui<S> {
    pub(super) const fn new(
        store: TaskStore<S>,
        settings: UiConfig,
        storage_warning: Option<String>,
    ) -> Self {
        Self {
            store,
            settings,
            mode: Mode::Adding,
            input: String::new(),
            selected: 0,
            message: None,
            storage_warning,
            should_quit: false,
        }
    }

    pub(super) fn view(&self) -> ViewModel {
        render(&self.store.snapshot())
    }

    pub(super) fn selected_id(&self) -> Option<TaskId> {
        self.store.filtered().get(self.selected).map(|task| task.id)
    }

    pub(super) fn select_next(&mut self) {
        let len = self.store.filtered().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub(super) const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(super) const fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(super) fn select_last(&mut self) {
        self.selected = self.store.filtered().len().saturating_sub(1);
    }

    /// Keep `id` selected if it is still visible, otherwise stay in range.
    fn follow(&mut self, id: Option<TaskId>) {
        let visible = self.store.filtered();
        if let Some(id) = id
            && let Some(index) = visible.iter().position(|task| task.id == id)
        {
            self.selected = index;
            return;
        }
        self.selected = self.selected.min(visible.len().saturating_sub(1));
    }

    /// Apply an intent and report the result in the status line.
    ///
    /// Returns `false` when the store rejected the intent.
    pub(super) fn dispatch(&mut self, intent: Intent) -> bool {
        let was_durable = self.store.is_durable();
        let keep = self.selected_id();
        match self.store.apply(intent) {
            Ok(outcome) => {
                self.report(&outcome, keep);
                if was_durable && !self.store.is_durable() {
                    self.error(NOT_SAVED_WARNING);
                }
                true
            }
            Err(err) => {
                self.error(err.to_string());
                false
            }
        }
    }

    fn report(&mut self, outcome: &Outcome, keep: Option<TaskId>) {
        match outcome {
            Outcome::Added(task) => {
                self.follow(Some(task.id));
                self.info("Task added");
            }
            Outcome::Toggled(task) => {
                self.follow(keep);
                self.info(if task.completed {
                    "Marked as completed"
                } else {
                    "Marked as active"
                });
            }
            Outcome::Edited(_) => {
                self.follow(keep);
                self.info("Task updated");
            }
            Outcome::Deleted(true) => {
                self.follow(None);
                self.info("Task deleted");
            }
            Outcome::Deleted(false) => {
                self.follow(None);
                self.error("Task no longer exists");
            }
            Outcome::Cleared(count) => {
                self.follow(keep);
                let noun = if *count == 1 { "task" } else { "tasks" };
                self.info(format!("Cleared {count} completed {noun}"));
            }
            Outcome::FilterChanged(_) => self.follow(keep),
        }
    }

    /// Whether changes currently reach durable storage.
    pub(super) const fn is_saving(&self) -> bool {
        self.storage_warning.is_none() && self.store.is_durable()
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    pub(super) fn tick(&mut self) {
        let ttl = Duration::from_secs(self.settings.message_ttl_secs);
        if let Some(msg) = &self.message
            && msg.is_expired(ttl)
        {
            self.message = None;
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let view = self.view();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(FILTER_BAR_HEIGHT),
                Constraint::Min(LIST_MIN_HEIGHT),
                Constraint::Length(SUMMARY_HEIGHT),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(f.area());

        self.draw_input(f, chunks[0]);
        draw_filter_bar(f, chunks[1], &view);
        self.draw_task_list(f, chunks[2], &view);
        draw_summary(f, chunks[3], &view);
        self.draw_status(f, chunks[4]);
    }
}

#[derive(Debug, Clone)]
pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self::new(text.into(), MessageLevel::Info)
    }

    fn error(text: impl Into<String>) -> Self {
        Self::new(text.into(), MessageLevel::Error)
    }

    fn new(text: String, level: MessageLevel) -> Self {
        Self {
            text,
            level,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }

    #[cfg(test)]
    pub(super) fn backdate(&mut self, by: Duration) {
        if let Some(earlier) = self.created_at.checked_sub(by) {
            self.created_at = earlier;
        }
    }
}
