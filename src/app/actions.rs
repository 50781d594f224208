//! Key bindings: which key triggers which menu action.

use crate::input::Key;

/// A menu action, independent of the key that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Top,
    Bottom,
    Select,
    Quit,
    Scratchpad,
    StartSession,
    StartShell,
    KillSession,
    KillServer,
}

impl Action {
    /// Map a key to its action. Unbound keys map to `None`.
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Up => Action::Up,
            Key::Down => Action::Down,
            Key::Home => Action::Top,
            Key::End => Action::Bottom,
            Key::Enter => Action::Select,
            Key::Escape => Action::Quit,
            Key::Char('k') => Action::Up,
            Key::Char('j') => Action::Down,
            Key::Char('g') => Action::Top,
            Key::Char('G') => Action::Bottom,
            Key::Char('q') => Action::Quit,
            Key::Char('0') => Action::Scratchpad,
            Key::Char('1') => Action::StartSession,
            Key::Char('2') => Action::StartShell,
            Key::Char('3') => Action::KillSession,
            Key::Char('4') => Action::KillServer,
            k if k == Key::ctrl('p') => Action::Up,
            k if k == Key::ctrl('n') => Action::Down,
            k if k == Key::ctrl('c') || k == Key::ctrl('d') => Action::Quit,
            Key::Left | Key::Right | Key::Char(_) => return None,
        };
        Some(action)
    }

    /// Actions that stay available when no session is running.
    pub fn allowed_without_sessions(self) -> bool {
        matches!(
            self,
            Action::Quit
                | Action::Scratchpad
                | Action::StartSession
                | Action::StartShell
                | Action::KillServer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_bindings() {
        assert_eq!(Action::from_key(Key::Up), Some(Action::Up));
        assert_eq!(Action::from_key(Key::Char('k')), Some(Action::Up));
        assert_eq!(Action::from_key(Key::ctrl('p')), Some(Action::Up));
        assert_eq!(Action::from_key(Key::Down), Some(Action::Down));
        assert_eq!(Action::from_key(Key::Char('j')), Some(Action::Down));
        assert_eq!(Action::from_key(Key::Char('g')), Some(Action::Top));
        assert_eq!(Action::from_key(Key::End), Some(Action::Bottom));
    }

    #[test]
    fn test_command_bindings() {
        assert_eq!(Action::from_key(Key::Char('0')), Some(Action::Scratchpad));
        assert_eq!(Action::from_key(Key::Char('3')), Some(Action::KillSession));
        assert_eq!(Action::from_key(Key::ctrl('c')), Some(Action::Quit));
        assert_eq!(Action::from_key(Key::Escape), Some(Action::Quit));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(Action::from_key(Key::Char('x')), None);
        assert_eq!(Action::from_key(Key::Char('5')), None);
        assert_eq!(Action::from_key(Key::Left), None);
    }

    #[test]
    fn test_allowed_without_sessions() {
        assert!(Action::StartSession.allowed_without_sessions());
        assert!(Action::KillServer.allowed_without_sessions());
        assert!(!Action::KillSession.allowed_without_sessions());
        assert!(!Action::Select.allowed_without_sessions());
        assert!(!Action::Down.allowed_without_sessions());
    }
}
