//! Command legend shown under the session list.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// A single keybinding entry for display
struct LegendEntry {
    key: &'static str,
    label: &'static str,
}

/// Entries for the current state. Kill-session is only offered when there is
/// a session to kill; navigation only when there is something to move over.
fn entries(has_sessions: bool) -> Vec<LegendEntry> {
    let mut entries = Vec::new();
    if has_sessions {
        entries.push(LegendEntry { key: "j/k", label: "move" });
        entries.push(LegendEntry { key: "g/G", label: "first/last" });
        entries.push(LegendEntry { key: "Enter", label: "attach" });
    }
    entries.push(LegendEntry { key: "q", label: "quit" });
    entries.push(LegendEntry { key: "0", label: "scratchpad" });
    entries.push(LegendEntry { key: "1", label: "start session" });
    entries.push(LegendEntry { key: "2", label: "start shell" });
    if has_sessions {
        entries.push(LegendEntry { key: "3", label: "kill session" });
    }
    entries.push(LegendEntry { key: "4", label: "kill server" });
    entries
}

/// One line per entry.
pub fn legend_lines(has_sessions: bool) -> Vec<Line<'static>> {
    entries(has_sessions)
        .into_iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!(" {:>5} ", entry.key),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.label, Style::default().fg(Color::White)),
            ])
        })
        .collect()
}
