use std::time::Duration;

use anyhow::Result;
use ratatui::{backend::Backend, widgets::Paragraph, Frame, Terminal};

use crate::app::{App, Outcome, Transition};
use crate::input::{ByteSource, EventPoller};
use crate::ui;

/// Run the menu until it produces an outcome.
///
/// Strictly sequential: render, block for the next event, apply it. Errors
/// only come from terminal I/O or a termination signal; the state machine
/// itself cannot fail.
pub fn run_menu<B: Backend, S: ByteSource>(
    terminal: &mut Terminal<B>,
    poller: &mut EventPoller<S>,
    app: &mut App,
    poll_interval: Duration,
) -> Result<Outcome> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let event = poller.next_event(poll_interval)?;

        match app.handle_event(event) {
            Transition::Continue => {}
            Transition::Redraw => {
                tracing::debug!(cols = app.term_size.0, rows = app.term_size.1, "terminal resized");
                terminal.autoresize()?;
                terminal.clear()?;
            }
            Transition::Exit(outcome) => return Ok(outcome),
        }
    }
}

fn draw_ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let text = ui::render(app, app.term_size.0);
    // Keep the cursor row on screen when the list is taller than the terminal
    let cursor_line = ui::FIRST_SESSION_LINE + app.cursor();
    let scroll = cursor_line.saturating_sub(usize::from(area.height.saturating_sub(1)));
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(text).scroll((scroll, 0)), area);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::input::poller::ScriptedSource;
    use crate::input::{InputError, SignalFlags};
    use crate::session::SessionListing;

    const TICK: Duration = Duration::from_millis(5);

    fn app(names: &[&str]) -> App {
        let listing = SessionListing {
            scratchpad_running: true,
            sessions: names.iter().map(|s| (*s).to_string()).collect(),
        };
        App::new(listing, None, (40, 20), "/work".to_string())
    }

    fn run(
        app: &mut App,
        reads: Vec<Option<&str>>,
        signals: SignalFlags,
    ) -> (Result<Outcome>, Terminal<TestBackend>) {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let mut poller = EventPoller::new(ScriptedSource::new(reads), signals, Duration::ZERO);
        let result = run_menu(&mut terminal, &mut poller, app, TICK);
        (result, terminal)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_enter_on_second_row_attaches() {
        let mut app = app(&["alpha", "beta"]);
        let (result, _) = run(&mut app, vec![Some("j"), None, Some("\r")], SignalFlags::default());
        assert_eq!(result.unwrap(), Outcome::Attach("beta".into()));
    }

    #[test]
    fn test_arrow_keys_drive_navigation() {
        let mut app = app(&["alpha", "beta", "gamma"]);
        let (result, _) = run(
            &mut app,
            vec![Some("\x1b[A"), Some("\x1b[A"), Some("\r")],
            SignalFlags::default(),
        );
        assert_eq!(result.unwrap(), Outcome::Attach("beta".into()));
    }

    #[test]
    fn test_empty_list_ignores_kill_session() {
        let mut app = app(&[]);
        let (result, terminal) = run(&mut app, vec![Some("3"), Some("1")], SignalFlags::default());
        assert_eq!(result.unwrap(), Outcome::StartSession);
        assert!(screen(&terminal).contains("no running sessions"));
    }

    #[test]
    fn test_frame_lists_sessions() {
        let mut app = app(&["alpha", "beta"]);
        let (result, terminal) = run(&mut app, vec![Some("q")], SignalFlags::default());
        assert_eq!(result.unwrap(), Outcome::Quit);

        let screen = screen(&terminal);
        assert!(screen.contains("/work"));
        assert!(screen.contains("alpha"));
        assert!(screen.contains("beta"));
        assert!(screen.contains("kill session"));
    }

    #[test]
    fn test_resize_keeps_cursor() {
        let mut app = app(&["alpha", "beta", "gamma"]);
        let signals = SignalFlags::default();
        signals.notify_resize();
        let (result, _) = run(&mut app, vec![Some("G"), Some("4")], signals);
        assert_eq!(result.unwrap(), Outcome::KillServer);
        assert_eq!(app.term_size, (80, 24));
        assert_eq!(app.cursor(), 2);
    }

    #[test]
    fn test_termination_signal_stops_loop() {
        let mut app = app(&["alpha"]);
        let signals = SignalFlags::default();
        signals.notify_terminate(15);
        let (result, _) = run(&mut app, vec![Some("\r")], signals);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Terminated(15))
        ));
        assert!(app.outcome().is_none());
    }
}
