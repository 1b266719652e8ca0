use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tasklist_app::{Storage, ViewModel};
use tasklist_core::Filter;

use super::super::constants::INPUT_PLACEHOLDER;
use super::super::view::{Mode, Ui};
use super::util::tail_width;

impl<S: Storage> Ui<S> {
    pub(in crate::tui) fn draw_input(&self, f: &mut Frame<'_>, area: Rect) {
        let (title, focused) = match self.mode {
            Mode::Adding => ("New task", true),
            Mode::Editing(_) => ("Edit task (Enter: save, Esc: cancel)", true),
            Mode::Browse | Mode::ConfirmClear(_) => ("New task (a)", false),
        };
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        // Leave one column for the cursor.
        let width = usize::from(area.width).saturating_sub(3);
        let visible = tail_width(&self.input, width);
        let content = if self.input.is_empty() && !focused {
            Line::from(Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(visible)
        };
        f.render_widget(Paragraph::new(content).block(block), area);

        if focused {
            let offset = u16::try_from(visible.chars().count()).unwrap_or(u16::MAX);
            f.set_cursor_position((area.x.saturating_add(1).saturating_add(offset), area.y + 1));
        }
    }
}

/// Filter tabs with per-filter counts; the current one is highlighted.
pub(in crate::tui) fn draw_filter_bar(f: &mut Frame<'_>, area: Rect, view: &ViewModel) {
    let active = view.total - view.completed;
    let mut spans = Vec::with_capacity(Filter::ALL.len() * 2);
    for (index, filter) in Filter::ALL.into_iter().enumerate() {
        let count = match filter {
            Filter::All => view.total,
            Filter::Active => active,
            Filter::Completed => view.completed,
        };
        let label = format!(" {} {} ({count}) ", index + 1, filter.label());
        let style = if filter == view.filter {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Filter (Tab)").borders(Borders::ALL));
    f.render_widget(bar, area);
}
