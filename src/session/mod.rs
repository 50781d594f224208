//! Running-session discovery and most-recently-used ordering.
//!
//! This module provides:
//! - `Multiplexer` - the seam to the external session manager
//! - `Tmux` - the tmux implementation
//! - `History` - the persisted recency history
//! - `list_sessions` - the provider the menu is seeded from

pub mod error;
pub mod history;
pub mod tmux;

pub use error::MuxError;
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use tmux::Tmux;

/// Identifier of the scratchpad session. Never part of the navigable list.
pub const SCRATCHPAD: &str = "0";

/// Something that can report its running sessions.
pub trait Multiplexer {
    /// Raw output of the multiplexer's list command, one session per line.
    fn list_sessions(&self) -> Result<String, MuxError>;
}

/// Result of querying the multiplexer once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionListing {
    pub scratchpad_running: bool,
    pub sessions: Vec<String>,
}

/// Query the multiplexer and order the result by recency.
///
/// Any multiplexer failure degrades to "no sessions".
pub fn list_sessions(mux: &impl Multiplexer, history: Option<&History>) -> SessionListing {
    let output = match mux.list_sessions() {
        Ok(output) => output,
        Err(e @ MuxError::Exit { .. }) => {
            // tmux exits non-zero when no server is running
            tracing::debug!(error = %e, "no sessions listed");
            return SessionListing::default();
        }
        Err(e) => {
            tracing::warn!(error = %e, "session listing unavailable");
            return SessionListing::default();
        }
    };

    let mut listing = parse_listing(&output);
    if let Some(history) = history {
        listing.sessions = order_by_history(&listing.sessions, &history.load());
    }
    tracing::debug!(
        sessions = listing.sessions.len(),
        scratchpad = listing.scratchpad_running,
        "listed sessions"
    );
    listing
}

/// Parse list output: the identifier is everything before the first `:`.
///
/// The scratchpad is split out and the rest is sorted lexically.
pub fn parse_listing(output: &str) -> SessionListing {
    let mut listing = SessionListing::default();
    for line in output.lines() {
        let name = line.split(':').next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }
        if name == SCRATCHPAD {
            listing.scratchpad_running = true;
        } else if !listing.sessions.iter().any(|s| s == name) {
            listing.sessions.push(name.to_string());
        }
    }
    listing.sessions.sort();
    listing
}

/// Order `sessions` most-recently-used first.
///
/// History entries that are still running come first, in history order;
/// everything else follows in lexical order.
pub fn order_by_history(sessions: &[String], history: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(sessions.len());
    for name in history {
        if sessions.contains(name) && !ordered.contains(name) {
            ordered.push(name.clone());
        }
    }

    let mut rest: Vec<String> = sessions
        .iter()
        .filter(|name| !ordered.contains(name))
        .cloned()
        .collect();
    rest.sort();
    ordered.extend(rest);
    ordered
}
