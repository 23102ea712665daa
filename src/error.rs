//! Error type shared by every fallible operation in the library.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// Malformed cut data, a bad frame count, or too few boundaries to form a scene.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A user-supplied setting that cannot be used.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Required tool `{0}` was not found in PATH")]
    ToolNotFound(String),

    #[error("`{tool}` exited with {status}")]
    Tool {
        tool: String,
        status: ExitStatus,
    },
}

impl SceneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
