//! QAMD TUI - Terminal host for rendered answers
//!
//! This crate contains all ratatui/crossterm integration:
//! - App state and the answer layout
//! - Event loop and input handling
//! - Copy controls backed by a clipboard worker thread
//! - Theme system

pub mod app;
pub mod copy_worker;
pub mod input;
pub mod render;
pub mod terminal;
pub mod theme;
pub mod ui;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use std::time::{Duration, Instant};

// Re-export main types
pub use app::App;

/// Run the TUI application
pub fn run(mut app: App) -> Result<()> {
    let mut terminal = terminal::init().context("Failed to initialize terminal")?;

    let result = run_loop(&mut terminal, &mut app);

    // Always restore terminal, even if run_loop fails
    terminal::restore().context("Failed to restore terminal")?;

    result
}

fn run_loop(terminal: &mut terminal::Tui, app: &mut App) -> Result<()> {
    loop {
        // -1 for status bar, -2 for borders
        let viewport_height = terminal.size()?.height.saturating_sub(3) as usize;

        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("Failed to draw frame")?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(100)).context("Failed to poll events")? {
            if let Event::Key(key) = crossterm::event::read().context("Failed to read event")? {
                // Only handle key press events, ignore release
                if key.kind == KeyEventKind::Press {
                    input::handle_input(app, key, viewport_height)?;
                }
            }
        }

        // Pick up finished clipboard writes and expire "Copied!" faces
        app.poll_copy(Instant::now());
    }

    Ok(())
}
