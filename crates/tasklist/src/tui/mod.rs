//! Interactive terminal UI over a [`TaskStore`].

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tasklist_app::{Storage, TaskStore, UiConfig};
use tracing::subscriber::NoSubscriber;

mod constants;
mod handlers;
mod view;
mod widgets;


use self::view::Ui;

/// Launch the interactive TUI.
///
/// `storage_warning` is shown until the session ends when set.
pub fn run<S: Storage>(
    store: TaskStore<S>,
    settings: UiConfig,
    storage_warning: Option<String>,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    // Log lines would corrupt the alternate screen.
    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        let mut ui = Ui::new(store, settings, storage_warning);
        run_event_loop(&mut terminal, &mut ui)
    });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ui: &mut Ui<S>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(ui.settings.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();
        if event::poll(timeout)?
            && let CrosstermEvent::Key(key) = event::read()?
        {
            ui.handle_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
