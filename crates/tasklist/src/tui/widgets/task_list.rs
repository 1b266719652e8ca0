use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use tasklist_app::{RowView, Storage, ViewModel};

use super::super::constants::{ACTIVE_MARKER, COMPLETED_MARKER, HIGHLIGHT_SYMBOL};
use super::super::view::{Mode, Ui};
use super::util::fit_width;

impl<S: Storage> Ui<S> {
    pub(in crate::tui) fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect, view: &ViewModel) {
        let block = Block::default()
            .title(format!("Tasks ({})", view.filter.label()))
            .borders(Borders::ALL);

        if let Some(empty) = &view.empty_state {
            let item = ListItem::new(Line::from(Span::styled(
                empty.as_str(),
                Style::default().fg(Color::DarkGray),
            )));
            f.render_widget(List::new(vec![item]).block(block), area);
            return;
        }

        // Borders, highlight symbol and marker all take columns from the text.
        let reserved = 2 + HIGHLIGHT_SYMBOL.chars().count() + ACTIVE_MARKER.len();
        let width = usize::from(area.width).saturating_sub(reserved);
        let items: Vec<ListItem<'_>> = view.rows.iter().map(|row| row_item(row, width)).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        if !matches!(self.mode, Mode::Adding) {
            state.select(Some(self.selected.min(view.rows.len().saturating_sub(1))));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}

fn row_item(row: &RowView, width: usize) -> ListItem<'static> {
    let text = fit_width(&row.text, width).into_owned();
    let line = if row.completed {
        Line::from(vec![
            Span::styled(COMPLETED_MARKER, Style::default().fg(Color::Green)),
            Span::styled(
                text,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
        ])
    } else {
        Line::from(vec![Span::raw(ACTIVE_MARKER), Span::raw(text)])
    };
    ListItem::new(line)
}
