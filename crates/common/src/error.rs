//! Error types shared across flowbeat crates.

/// Top-level error type for flowbeat operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowbeatError {
    /// The input frame cannot be processed with the configured geometry.
    #[error("Shape error: {message}")]
    Shape { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FlowbeatError.
pub type FlowbeatResult<T> = Result<T, FlowbeatError>;

impl FlowbeatError {
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
