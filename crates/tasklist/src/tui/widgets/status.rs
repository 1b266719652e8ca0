use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tasklist_app::view::clear_completed_prompt;
use tasklist_app::{Storage, ViewModel};

use super::super::constants::NOT_SAVED_WARNING;
use super::super::view::{Mode, Ui};

impl<S: Storage> Ui<S> {
    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let help = Line::from(Span::styled(
            self.help_text(),
            Style::default().fg(Color::DarkGray),
        ));
        let status = self.status_line();
        let paragraph =
            Paragraph::new(vec![help, status]).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    pub(in crate::tui) const fn help_text(&self) -> &'static str {
        match self.mode {
            Mode::Browse => {
                "a: add  e: edit  space: toggle  d: delete  1/2/3/Tab: filter  C: clear done  q: quit"
            }
            Mode::Adding => "Enter: add  Esc: back to list",
            Mode::Editing(_) => "Enter: save  Esc: cancel",
            Mode::ConfirmClear(_) => "y: confirm  n/Esc: cancel",
        }
    }

    /// Prompt first, then the transient message, then the persistent save warning.
    pub(in crate::tui) fn status_line(&self) -> Line<'_> {
        if let Mode::ConfirmClear(count) = self.mode {
            return Line::from(Span::styled(
                format!("{} (y/n)", clear_completed_prompt(count)),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(message) = &self.message {
            return Line::from(Span::styled(message.text.as_str(), message.style()));
        }
        if !self.is_saving() {
            let text = self.storage_warning.as_deref().unwrap_or(NOT_SAVED_WARNING);
            return Line::from(Span::styled(text, Style::default().fg(Color::Yellow)));
        }
        Line::default()
    }
}

/// Remaining count, plus a clear hint once something is completed.
pub(in crate::tui) fn draw_summary(f: &mut Frame<'_>, area: Rect, view: &ViewModel) {
    let mut spans = vec![Span::styled(
        view.summary.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if view.completed > 0 {
        spans.push(Span::styled(
            format!("   C: clear {} completed", view.completed),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let summary = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, area);
}
