use thiserror::Error;

/// Core error types for ratewin
#[derive(Debug, Error)]
pub enum CoreError {
    /// Leaf reduction was asked to summarise zero points
    #[error("cannot reduce an empty range")]
    EmptyRange,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Config("leaf_threshold must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: leaf_threshold must be > 0"
        );
        assert_eq!(CoreError::EmptyRange.to_string(), "cannot reduce an empty range");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
