//! Terminal setup and teardown for the answer viewer
//!
//! The viewer owns the alternate screen while it runs. The copy worker may
//! write OSC 52 sequences to stdout at the same time, which is why no mouse
//! or paste modes are enabled here: key events are all the viewer reads.

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::sync::Once;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Enter raw mode and the alternate screen
///
/// A panic while the viewer runs restores the terminal before the panic
/// message is printed.
pub fn init() -> Result<Tui> {
    install_panic_hook();

    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend).context("Failed to create viewer terminal")
}

/// Leave the alternate screen and raw mode. Safe to call more than once.
pub fn restore() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Chain a terminal restore in front of the current panic hook. Returns
/// whether this call installed it; later calls leave the hook alone.
pub fn install_panic_hook() -> bool {
    let mut installed = false;
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if let Err(e) = restore() {
                log::error!("Terminal restore after panic failed: {e:#}");
            }
            previous(info);
        }));
        installed = true;
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    // Entering raw mode needs a TTY; only the hook bookkeeping is tested here.
    #[test]
    fn test_panic_hook_installed_once() {
        install_panic_hook();
        assert!(!install_panic_hook());
        assert!(PANIC_HOOK.is_completed());
    }
}
