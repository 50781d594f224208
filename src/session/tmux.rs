//! The tmux-backed multiplexer.

use std::process::Command;

use super::error::MuxError;
use super::Multiplexer;

/// Shells out to the `tmux` binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    bin: String,
}

impl Tmux {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Multiplexer for Tmux {
    fn list_sessions(&self) -> Result<String, MuxError> {
        let output = Command::new(&self.bin)
            .arg("list-sessions")
            .output()
            .map_err(|source| MuxError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MuxError::Exit {
                bin: self.bin.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| MuxError::NonUtf8 {
            bin: self.bin.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let tmux = Tmux::new("/nonexistent/tmux-menu-test-binary");
        assert!(matches!(tmux.list_sessions(), Err(MuxError::Spawn { .. })));
    }

    #[test]
    fn test_failing_command_is_exit_error() {
        let tmux = Tmux::new("false");
        assert!(matches!(tmux.list_sessions(), Err(MuxError::Exit { .. })));
    }
}
