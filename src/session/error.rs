//! Error types for talking to the multiplexer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuxError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{bin} exited with {status}: {stderr}")]
    Exit {
        bin: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{bin} produced non-UTF-8 output")]
    NonUtf8 { bin: String },
}
