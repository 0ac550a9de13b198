//! Terminal session setup and teardown.
//!
//! [`TerminalSession`] is an RAII guard: creating it switches the terminal
//! into raw mode on the alternate screen with the cursor hidden, and dropping
//! it puts everything back, even when the ticker bails out early.

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;
use tracing::{debug, warn};

/// Holds the terminal in ticker mode for as long as it lives.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen, and hide the cursor.
    pub fn start() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, Drop restores the terminal if setup fails halfway.
        let session = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        debug!("Terminal session started");
        Ok(session)
    }

    /// Viewport size as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            warn!(error = %e, "Failed to restore screen");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "Failed to leave raw mode");
        }
        debug!("Terminal session ended");
    }
}

/// Discard any input typed so far, then block until a key is pressed.
pub fn wait_for_key() -> io::Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                debug!(?key.code, "Key pressed");
                return Ok(());
            }
        }
    }
}
