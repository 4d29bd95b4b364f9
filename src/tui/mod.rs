//! Terminal frontend (crossterm + ratatui). The core modules never depend on this one.

pub mod render;
pub mod terminal_guard;

use std::io;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::DevDash;
use crate::core::InputEvent;

pub use render::Palette;
pub use terminal_guard::TerminalGuard;

/// Columns the field panel's borders take from the terminal width.
const FIELD_PANEL_BORDER: u16 = 2;

/// Runs the dashboard until its exit signal closes.
pub fn run(dash: &mut DevDash) -> io::Result<()> {
    let guard = TerminalGuard::new()?;
    #[cfg(unix)]
    let _signals =
        terminal_guard::install_termination_signals(guard.restorer(), dash.exit_signal().clone())?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    let size = terminal.size()?;
    dash.set_viewport_width(size.width.saturating_sub(FIELD_PANEL_BORDER) as usize);

    let palette = Palette::from_theme(&dash.config().theme);
    let label_width = dash.config().label_width;
    let tick = dash.config().tick_interval();

    dash.activate();
    tracing::info!(tabs = dash.tabs().len(), "dashboard started");

    while !dash.exit_signal().is_closed() {
        dash.pump();
        let view = dash.view();
        terminal.draw(|frame| render::draw(frame, &view, &palette, label_width))?;

        if !crossterm::event::poll(tick)? {
            continue;
        }
        let Some(event) = InputEvent::from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        let event = match event {
            InputEvent::Resize(width, height) => {
                InputEvent::Resize(width.saturating_sub(FIELD_PANEL_BORDER), height)
            }
            other => other,
        };
        if dash.handle_input(&event).is_quit() {
            break;
        }
    }

    tracing::info!("dashboard stopped");
    drop(terminal);
    drop(guard);
    Ok(())
}
