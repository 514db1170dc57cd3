//! Engine error types.

use ratewin_types::CoreError;
use thiserror::Error;

/// Errors that abort a window computation. No partial results are
/// returned alongside any of them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error from the shared type layer (e.g. an empty leaf range)
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A requested window contains no points
    #[error("window with cutoff {cutoff_ms} contains no points")]
    EmptyWindow {
        /// Absolute cutoff timestamp (epoch-ms).
        cutoff_ms: u64,
    },

    /// Invalid engine parameters
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool construction failed
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// A scatter-gather task returned an error
    #[error("task {name} failed: {reason}")]
    TaskFailed {
        /// Task name.
        name: String,
        /// Rendered underlying error.
        reason: String,
    },

    /// A scatter-gather task panicked
    #[error("task {name} panicked")]
    TaskPanicked {
        /// Task name.
        name: String,
    },
}

impl EngineError {
    /// Creates an `InvalidConfig` error with a message.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }

    /// Returns true if the error stems from an empty window or range.
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyWindow { .. } | EngineError::Core(CoreError::EmptyRange)
        )
    }
}
