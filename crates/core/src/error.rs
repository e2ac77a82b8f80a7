use std::io;
use std::path::PathBuf;

/// Errors that can occur during terraform-runner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to launch {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read state file {}: {source}", .path.display())]
    StateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {} is not valid JSON: {source}", .path.display())]
    StateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("output exited with code {code}: {stderr}")]
    OutputFailed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for terraform-runner operations
pub type Result<T> = std::result::Result<T, Error>;
