use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tasklist_app::{Intent, Storage};
use tasklist_core::{Filter, MAX_TASK_LENGTH, unescape};

use super::view::{Mode, Ui};

impl<S: Storage> Ui<S> {
    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Adding | Mode::Editing(_) => self.handle_input_key(key),
            Mode::ConfirmClear(_) => self.handle_confirm_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a' | 'i' | '/') => {
                self.input.clear();
                self.mode = Mode::Adding;
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::Char(' ' | 'x') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(Intent::ToggleRequested(id));
                }
            }
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(Intent::DeleteRequested(id));
                }
            }
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('3') => self.set_filter(Filter::Completed),
            KeyCode::Tab => self.set_filter(self.store.filter().next()),
            KeyCode::Char('C') => self.request_clear_completed(),
            KeyCode::Char('c')
                if key
                    .modifiers
                    .contains(KeyModifiers::CONTROL | KeyModifiers::SHIFT) =>
            {
                self.request_clear_completed();
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.input.chars().count() < MAX_TASK_LENGTH {
                    self.input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        self.mode = Mode::Browse;
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                self.dispatch(Intent::ClearCompletedRequested);
            }
            _ => self.info("Clear cancelled"),
        }
    }

    fn submit_input(&mut self) {
        match self.mode {
            Mode::Adding => {
                // Stay in the input for the next task; keep the text on rejection.
                if self.dispatch(Intent::AddRequested(self.input.clone())) {
                    self.input.clear();
                }
            }
            Mode::Editing(id) => {
                let text = self.input.clone();
                if self.dispatch(Intent::EditRequested { id, text }) {
                    self.input.clear();
                    self.mode = Mode::Browse;
                }
            }
            Mode::Browse | Mode::ConfirmClear(_) => {}
        }
    }

    fn start_edit(&mut self) {
        let Some(task) = self.selected_id().and_then(|id| self.store.get(id)) else {
            return;
        };
        let (id, text) = (task.id, unescape(&task.text).into_owned());
        self.input = text;
        self.mode = Mode::Editing(id);
    }

    fn set_filter(&mut self, filter: Filter) {
        self.dispatch(Intent::FilterRequested(filter));
    }

    fn request_clear_completed(&mut self) {
        let completed = self.store.completed_count();
        if completed == 0 {
            self.info("No completed tasks to clear");
        } else if self.settings.confirm_clear_completed {
            self.mode = Mode::ConfirmClear(completed);
        } else {
            self.dispatch(Intent::ClearCompletedRequested);
        }
    }
}
