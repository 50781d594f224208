//! Terminal mode and screen ownership.
//!
//! - `RawMode` - scoped raw-mode guard; restores the prior mode on drop
//! - `MenuTerminal` - alternate screen + ratatui terminal for the menu loop
//! - `install_panic_hook` - restores the terminal before a panic is reported

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Set while a [`RawMode`] guard is alive.
static RAW_MODE_HELD: AtomicBool = AtomicBool::new(false);

/// Raw mode (no line buffering, no echo, no signal keys) for as long as the
/// guard lives. Dropping it restores the mode captured at acquisition.
#[derive(Debug)]
pub struct RawMode {
    _private: (),
}

impl RawMode {
    /// Capture the current terminal mode and switch to raw mode.
    ///
    /// Only one guard may exist at a time.
    pub fn acquire() -> Result<Self> {
        if RAW_MODE_HELD.swap(true, Ordering::SeqCst) {
            bail!("raw mode is already held by another reader");
        }
        if let Err(e) = enable_raw_mode() {
            RAW_MODE_HELD.store(false, Ordering::SeqCst);
            return Err(e).context("Failed to enable raw mode - are you in a terminal?");
        }
        tracing::debug!("raw mode acquired");
        Ok(Self { _private: () })
    }

    /// Restore the prior terminal mode now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
        RAW_MODE_HELD.store(false, Ordering::SeqCst);
        tracing::debug!("raw mode released");
    }
}

/// The menu's view of the terminal: raw mode, alternate screen, hidden cursor.
///
/// Dropping it leaves the alternate screen first, then releases raw mode.
pub struct MenuTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    _raw: RawMode,
}

impl MenuTerminal {
    pub fn enter() -> Result<Self> {
        let raw = RawMode::acquire()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        // Built before switching screens so Drop undoes a partial setup
        let mut menu = Self {
            terminal,
            _raw: raw,
        };
        execute!(menu.terminal.backend_mut(), EnterAlternateScreen, Hide)
            .context("Failed to setup terminal")?;
        Ok(menu)
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for MenuTerminal {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}

/// Restore the terminal before the default panic output is printed, so the
/// message is readable and the shell is usable afterwards.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        tracing::error!("panicked: {}", panic_info);
        previous(panic_info);
    }));
}
