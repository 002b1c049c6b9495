use std::path::PathBuf;

use dropzone_core::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read trace {path}: {source}")]
    ReadTrace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid trace: {message}")]
    InvalidTrace { message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidTrace { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid_trace(message: impl Into<String>) -> Self {
        Self::InvalidTrace {
            message: message.into(),
        }
    }
}
