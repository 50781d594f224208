//! Cursor navigation methods on App.

use super::*;

impl App {
    /// Move the cursor up one row, wrapping to the last row.
    pub fn navigate_up(&mut self) {
        let len = self.sessions.len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
    }

    /// Move the cursor down one row, wrapping to the first row.
    pub fn navigate_down(&mut self) {
        let len = self.sessions.len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor >= len - 1 { 0 } else { self.cursor + 1 };
    }

    /// Jump to the first row
    pub fn jump_to_first(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the last row
    pub fn jump_to_last(&mut self) {
        self.cursor = self.sessions.len().saturating_sub(1);
    }
}
