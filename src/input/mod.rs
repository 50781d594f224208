//! Keyboard and resize input for the menu.
//!
//! This module provides:
//! - `Key` - a decoded key token (known escape sequence or literal character)
//! - `Event` - the ordered event stream consumed by the menu loop
//! - `KeyDecoder` - byte-level decoding with escape-prefix disambiguation
//! - `EventPoller` - merges resize notifications, key reads, and the polling timeout

pub mod decoder;
pub mod poller;

pub use decoder::KeyDecoder;
pub use poller::{ByteSource, EventPoller, InputError, SignalFlags, TtySource};

/// A decoded key token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Carriage return or line feed
    Enter,
    /// A lone escape byte that did not start a known sequence
    Escape,
    /// Any other single character, including control characters
    Char(char),
}

impl Key {
    /// Ctrl+<letter> as delivered by a raw-mode terminal (0x01..=0x1a).
    pub fn ctrl(letter: char) -> Self {
        let code = (letter.to_ascii_lowercase() as u32)
            .saturating_sub('a' as u32)
            .saturating_add(1);
        Key::Char(char::from_u32(code).unwrap_or('\0'))
    }
}

/// Events delivered to the menu loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input
    Key(Key),
    /// Terminal resize (columns, rows)
    Resize(u16, u16),
}
