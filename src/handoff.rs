//! Files exchanged with the orchestrator that re-invokes the menu.
//!
//! - `session`: the chosen session name (empty if none). Read back at the
//!   next start to place the cursor on the previous selection.
//! - `command`: the outcome token (empty means attach).

use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::Outcome;

pub const SESSION_FILE: &str = "session";
pub const COMMAND_FILE: &str = "command";

#[derive(Debug, Clone)]
pub struct Handoff {
    dir: PathBuf,
}

impl Handoff {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Session chosen by the previous run, if it left one.
    pub fn previous_selection(&self) -> Option<String> {
        let path = self.dir.join(SESSION_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let name = contents.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable selection file");
                None
            }
        }
    }

    /// Write the outcome for the orchestrator.
    pub fn write(&self, outcome: &Outcome) -> Result<()> {
        DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(&self.dir)
            .with_context(|| format!("Failed to create hand-off directory: {}", self.dir.display()))?;

        let session = self.dir.join(SESSION_FILE);
        fs::write(&session, outcome.session_name().unwrap_or_default())
            .with_context(|| format!("Failed to write {}", session.display()))?;

        let command = self.dir.join(COMMAND_FILE);
        fs::write(&command, outcome.command_token())
            .with_context(|| format!("Failed to write {}", command.display()))?;

        Ok(())
    }

    /// Pass `result` through, leaving a `quit` behind when it is an error so
    /// the orchestrator never replays the previous run's command.
    pub fn quit_on_error(&self, result: Result<Outcome>) -> Result<Outcome> {
        if let Err(e) = &result {
            tracing::warn!("menu aborted: {:#}", e);
            if let Err(write_err) = self.write(&Outcome::Quit) {
                tracing::warn!("failed to write hand-off files: {:#}", write_err);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputError;

    #[test]
    fn test_error_replaces_stale_command_with_quit() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::new(dir.path());
        handoff.write(&Outcome::KillSession("alpha".into())).unwrap();

        let result = handoff.quit_on_error(Err(InputError::Closed.into()));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(dir.path().join(COMMAND_FILE)).unwrap(), "quit");
        assert_eq!(fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap(), "");
    }

    #[test]
    fn test_success_is_passed_through_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::new(dir.path());
        let result = handoff.quit_on_error(Ok(Outcome::StartShell));
        assert_eq!(result.unwrap(), Outcome::StartShell);
        assert!(!dir.path().join(COMMAND_FILE).exists());
    }

    #[test]
    fn test_no_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Handoff::new(dir.path()).previous_selection(), None);
    }

    #[test]
    fn test_previous_selection_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "beta\n").unwrap();
        assert_eq!(
            Handoff::new(dir.path()).previous_selection(),
            Some("beta".to_string())
        );
    }

    #[test]
    fn test_empty_selection_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "  \n").unwrap();
        assert_eq!(Handoff::new(dir.path()).previous_selection(), None);
    }

    #[test]
    fn test_write_attach() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::new(dir.path().join("run"));
        handoff.write(&Outcome::Attach("beta".into())).unwrap();

        let run = dir.path().join("run");
        assert_eq!(fs::read_to_string(run.join(SESSION_FILE)).unwrap(), "beta");
        assert_eq!(fs::read_to_string(run.join(COMMAND_FILE)).unwrap(), "");
        assert_eq!(handoff.previous_selection(), Some("beta".to_string()));
    }

    #[test]
    fn test_write_command_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let handoff = Handoff::new(dir.path());
        fs::write(dir.path().join(SESSION_FILE), "stale").unwrap();

        handoff.write(&Outcome::StartShell).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap(), "");
        assert_eq!(fs::read_to_string(dir.path().join(COMMAND_FILE)).unwrap(), "shell");
    }
}
