//! Independent type definitions used by App.

/// The decision a menu run converges to. Set exactly once; ends the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    OpenScratchpad,
    StartSession,
    StartShell,
    KillSession(String),
    KillServer,
    Attach(String),
}

impl Outcome {
    /// Command token handed to the orchestrator. Attach is the empty token.
    pub fn command_token(&self) -> &'static str {
        match self {
            Outcome::Quit => "quit",
            Outcome::OpenScratchpad => "scratchpad",
            Outcome::StartSession => "start-session",
            Outcome::StartShell => "shell",
            Outcome::KillSession(_) => "kill-session",
            Outcome::KillServer => "kill-server",
            Outcome::Attach(_) => "",
        }
    }

    /// Session the outcome applies to, if any.
    pub fn session_name(&self) -> Option<&str> {
        match self {
            Outcome::Attach(name) | Outcome::KillSession(name) => Some(name),
            _ => None,
        }
    }
}

/// What the loop should do after an event has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Keep looping
    Continue,
    /// Keep looping, repainting the whole screen first
    Redraw,
    /// Stop with this outcome
    Exit(Outcome),
}
