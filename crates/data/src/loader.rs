use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::decode_binary;
use crate::error::DataError;
use crate::validation::validate_series;
use ratewin_types::{Point, Series};

/// On-disk encoding of a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// JSON array of `{ "rate": f64, "timestamp": u64 }` objects
    Json,
    /// Fixed-width little-endian records, see [`crate::codec`]
    Bin,
}

impl SourceFormat {
    /// Format implied by the file extension (`.json`, `.bin`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bin => "bin",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "bin" | "binary" => Ok(Self::Bin),
            other => Err(DataError::ParseError(format!(
                "unknown source format '{other}' (expected json or bin)"
            ))),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a whole file, mapping a missing file to [`DataError::FileNotFound`].
///
/// # Errors
/// - [`DataError::FileNotFound`] when the file cannot be opened or read.
pub fn read_source(path: &Path) -> Result<Vec<u8>, DataError> {
    std::fs::read(path)
        .map_err(|e| DataError::FileNotFound(path.display().to_string(), e.to_string()))
}

/// Parses a JSON array of points.
///
/// Points keep the order they appear in; use [`into_series`] to sort.
///
/// # Errors
/// - [`DataError::ParseError`] when the document is not a point array.
/// - [`DataError::EmptyData`] when the array is empty.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<Point>, DataError> {
    let points: Vec<Point> =
        serde_json::from_slice(bytes).map_err(|e| DataError::ParseError(e.to_string()))?;
    if points.is_empty() {
        return Err(DataError::EmptyData);
    }
    Ok(points)
}

/// Loads points from a JSON file.
///
/// # Errors
/// - [`DataError::FileNotFound`] when the file cannot be read.
/// - Any error of [`parse_json`].
pub fn load_json(path: &Path) -> Result<Vec<Point>, DataError> {
    let bytes = read_source(path)?;
    parse_json(&bytes)
}

/// Decodes raw source bytes in the given format.
///
/// # Errors
/// - Any error of [`parse_json`] or [`decode_binary`].
pub fn parse_points(bytes: &[u8], format: SourceFormat) -> Result<Vec<Point>, DataError> {
    let points = match format {
        SourceFormat::Json => parse_json(bytes)?,
        SourceFormat::Bin => decode_binary(bytes)?,
    };
    if points.is_empty() {
        return Err(DataError::EmptyData);
    }
    Ok(points)
}

/// Loads points from a file in the given format.
///
/// # Errors
/// - [`DataError::FileNotFound`] when the file cannot be read.
/// - Any error of [`parse_points`].
pub fn load_points(path: &Path, format: SourceFormat) -> Result<Vec<Point>, DataError> {
    let bytes = read_source(path)?;
    parse_points(&bytes, format)
}

/// Orders points newest first and wraps them in a shared [`Series`].
///
/// The sort is stable, so points with equal timestamps keep their input
/// order (and are later rejected by [`validate_series`]).
///
/// # Errors
/// - [`DataError::EmptyData`] when `points` is empty.
pub fn into_series(mut points: Vec<Point>) -> Result<Series, DataError> {
    if points.is_empty() {
        return Err(DataError::EmptyData);
    }
    points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Series::from_points(points))
}

/// Convenience: load, order and validate a series.
///
/// # Errors
/// - Any error of [`load_points`], [`into_series`] or [`validate_series`].
pub fn load_and_validate(path: &Path, format: SourceFormat) -> Result<Series, DataError> {
    let points = load_points(path, format)?;
    let series = into_series(points)?;
    validate_series(&series)?;
    tracing::info!(
        path = %path.display(),
        format = %format,
        points = series.len(),
        "series loaded"
    );
    Ok(series)
}
