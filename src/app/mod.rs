//! Menu state machine.
//!
//! `App` holds the session list, the cursor, and the pending outcome. Events
//! are applied one at a time by [`App::handle_event`], whose transition table
//! is total: unbound keys, and keys that need a session while none are
//! running, are ignored.

mod actions;
mod navigation;
mod state;

pub use actions::Action;
pub use state::{Outcome, Transition};

use crate::input::{Event, Key};
use crate::session::SessionListing;

/// Application state
#[derive(Debug, Clone)]
pub struct App {
    /// Running sessions in display order (immutable during the loop)
    sessions: Vec<String>,
    /// Whether the scratchpad session was running at startup
    scratchpad_running: bool,
    /// Index into `sessions`; meaningful only when the list is non-empty
    cursor: usize,
    /// Terminal size (columns, rows)
    pub term_size: (u16, u16),
    /// Working directory shown in the title
    pub cwd: String,
    outcome: Option<Outcome>,
}

impl App {
    /// Build the initial state. The cursor starts on `previous` when it is
    /// still running, otherwise on the first row.
    pub fn new(listing: SessionListing, previous: Option<&str>, term_size: (u16, u16), cwd: String) -> Self {
        let cursor = previous
            .and_then(|name| listing.sessions.iter().position(|s| s == name))
            .unwrap_or(0);
        Self {
            sessions: listing.sessions,
            scratchpad_running: listing.scratchpad_running,
            cursor,
            term_size,
            cwd,
            outcome: None,
        }
    }

    pub fn sessions(&self) -> &[String] {
        &self.sessions
    }

    pub fn scratchpad_running(&self) -> bool {
        self.scratchpad_running
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: Event) -> Transition {
        if let Some(outcome) = &self.outcome {
            return Transition::Exit(outcome.clone());
        }
        match event {
            Event::Resize(cols, rows) => {
                self.resize(cols, rows);
                Transition::Redraw
            }
            Event::Key(key) => self.handle_key(key),
        }
    }

    /// Record new terminal dimensions. Cursor and sessions are untouched.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.term_size = (cols, rows);
    }

    fn handle_key(&mut self, key: Key) -> Transition {
        let Some(action) = Action::from_key(key) else {
            return Transition::Continue;
        };
        if self.sessions.is_empty() && !action.allowed_without_sessions() {
            return Transition::Continue;
        }

        let outcome = match action {
            Action::Up => {
                self.navigate_up();
                return Transition::Continue;
            }
            Action::Down => {
                self.navigate_down();
                return Transition::Continue;
            }
            Action::Top => {
                self.jump_to_first();
                return Transition::Continue;
            }
            Action::Bottom => {
                self.jump_to_last();
                return Transition::Continue;
            }
            Action::Select => Outcome::Attach(self.sessions[self.cursor].clone()),
            Action::KillSession => Outcome::KillSession(self.sessions[self.cursor].clone()),
            Action::Quit => Outcome::Quit,
            Action::Scratchpad => Outcome::OpenScratchpad,
            Action::StartSession => Outcome::StartSession,
            Action::StartShell => Outcome::StartShell,
            Action::KillServer => Outcome::KillServer,
        };

        self.outcome = Some(outcome.clone());
        Transition::Exit(outcome)
    }
}
