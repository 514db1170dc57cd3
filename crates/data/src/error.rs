//! Data-layer error types.

use thiserror::Error;

/// Errors that can occur while loading, validating or caching rate series.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required file was not found on disk.
    #[error("File not found: {0} ({1})")]
    FileNotFound(String, String),

    /// JSON parsing or decoding failed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No points were loaded.
    #[error("Empty data")]
    EmptyData,

    /// Data violated a series invariant.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Binary input ended in the middle of a record.
    #[error("Truncated record: {trailing} trailing bytes after {records} complete records")]
    TruncatedRecord {
        /// Number of complete records before the partial one.
        records: usize,
        /// Bytes left over after the last complete record.
        trailing: usize,
    },

    /// Adjacent points are not spaced by the common interval.
    #[error("Non-uniform interval at index {index}: expected {expected} ms, got {actual} ms")]
    NonUniformInterval {
        /// Index of the older point of the offending pair.
        index: usize,
        /// Spacing of the first pair (ms).
        expected: u64,
        /// Spacing observed at `index` (ms).
        actual: u64,
    },

    /// Reading or writing the series cache failed.
    #[error("Cache error: {0}")]
    Cache(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::NonUniformInterval {
            index: 4,
            expected: 10,
            actual: 30,
        };
        assert_eq!(
            err.to_string(),
            "Non-uniform interval at index 4: expected 10 ms, got 30 ms"
        );

        let err = DataError::TruncatedRecord {
            records: 2,
            trailing: 7,
        };
        assert_eq!(
            err.to_string(),
            "Truncated record: 7 trailing bytes after 2 complete records"
        );
    }
}
