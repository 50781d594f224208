//! Frame rendering.
//!
//! [`render`] is a pure function of the menu state and terminal width: it
//! builds the whole frame as styled text and never touches the terminal.

pub mod legend;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub use legend::legend_lines;

/// Line index of the first session row in a rendered frame.
pub const FIRST_SESSION_LINE: usize = 3;

/// Build the frame: title, scratchpad status, session list, separator, legend.
pub fn render(app: &App, width: u16) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            " tmux-menu ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.cwd.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]));

    lines.push(if app.scratchpad_running() {
        Line::from(Span::styled(
            " scratchpad running",
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            " scratchpad not running",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    });

    lines.push(Line::default());

    if app.sessions().is_empty() {
        lines.push(Line::from(Span::styled(
            " no running sessions",
            Style::default().fg(Color::Red),
        )));
    } else {
        for (idx, name) in app.sessions().iter().enumerate() {
            let row = pad_to_width(&format!(" {name}"), width);
            let style = if idx == app.cursor() {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(row, style)));
        }
    }

    lines.push(Line::default());
    lines.extend(legend_lines(!app.sessions().is_empty()));

    Text::from(lines)
}

/// Right-pad `text` with spaces to `width` display columns. Text that is
/// already wider is returned as is.
fn pad_to_width(text: &str, width: u16) -> String {
    let current = text.width();
    let target = usize::from(width);
    if current >= target {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(target - current))
}
