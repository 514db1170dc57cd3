//! Series validation helpers.

use crate::error::DataError;
use ratewin_types::Point;

/// Validates a newest-first series.
///
/// # Errors
/// - [`DataError::EmptyData`] when `points` is empty.
/// - [`DataError::CorruptData`] on a NaN/Inf rate, or a timestamp that is
///   not strictly older than its predecessor.
pub fn validate_series(points: &[Point]) -> Result<(), DataError> {
    if points.is_empty() {
        return Err(DataError::EmptyData);
    }

    for (i, point) in points.iter().enumerate() {
        if !point.rate.is_finite() {
            return Err(DataError::CorruptData(format!(
                "NaN/Inf rate at index {i}: {point:?}"
            )));
        }

        if i > 0 && point.timestamp >= points[i - 1].timestamp {
            let kind = if point.timestamp == points[i - 1].timestamp {
                "Duplicate"
            } else {
                "Out-of-order"
            };
            return Err(DataError::CorruptData(format!(
                "{kind} timestamp at index {i}: {} >= {}",
                point.timestamp,
                points[i - 1].timestamp
            )));
        }
    }

    Ok(())
}

/// Common spacing (ms) of a newest-first series.
///
/// Returns `None` for fewer than two points, where any interval fits.
///
/// # Errors
/// - [`DataError::CorruptData`] when the series is not strictly descending.
/// - [`DataError::NonUniformInterval`] at the first pair whose spacing
///   differs from the first pair's.
pub fn infer_interval(points: &[Point]) -> Result<Option<u64>, DataError> {
    let mut expected = None;

    for (i, pair) in points.windows(2).enumerate() {
        let actual = spacing(pair[0], pair[1], i + 1)?;
        match expected {
            None => expected = Some(actual),
            Some(expected) if expected != actual => {
                return Err(DataError::NonUniformInterval {
                    index: i + 1,
                    expected,
                    actual,
                });
            }
            Some(_) => {}
        }
    }

    Ok(expected)
}

/// Spacing between a point and the next older one.
fn spacing(newer: Point, older: Point, index: usize) -> Result<u64, DataError> {
    match newer.timestamp.checked_sub(older.timestamp) {
        Some(gap) if gap > 0 => Ok(gap),
        _ => Err(DataError::CorruptData(format!(
            "Non-descending timestamp at index {index}: {} >= {}",
            older.timestamp, newer.timestamp
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(timestamps: &[u64]) -> Vec<Point> {
        timestamps.iter().map(|&ts| Point::new(1.0, ts)).collect()
    }

    #[test]
    fn test_validate_accepts_descending() {
        assert!(validate_series(&points(&[30, 20, 10])).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(validate_series(&[]), Err(DataError::EmptyData)));
    }

    #[test]
    fn test_validate_rejects_nan_and_inf() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = validate_series(&[Point::new(1.0, 2), Point::new(rate, 1)]).unwrap_err();
            assert!(matches!(err, DataError::CorruptData(ref msg) if msg.contains("index 1")));
        }
    }

    #[test]
    fn test_validate_rejects_duplicates_and_disorder() {
        let err = validate_series(&points(&[30, 30, 10])).unwrap_err();
        assert!(matches!(err, DataError::CorruptData(ref msg) if msg.starts_with("Duplicate")));

        let err = validate_series(&points(&[10, 20, 30])).unwrap_err();
        assert!(matches!(err, DataError::CorruptData(ref msg) if msg.starts_with("Out-of-order")));
    }

    #[test]
    fn test_infer_uniform_interval() {
        assert_eq!(infer_interval(&points(&[50, 40, 30, 20])).unwrap(), Some(10));
        assert_eq!(infer_interval(&points(&[7])).unwrap(), None);
        assert_eq!(infer_interval(&[]).unwrap(), None);
    }

    #[test]
    fn test_infer_reports_first_irregular_gap() {
        let err = infer_interval(&points(&[50, 40, 10, 0])).unwrap_err();
        assert!(matches!(
            err,
            DataError::NonUniformInterval {
                index: 2,
                expected: 10,
                actual: 30
            }
        ));
    }

    #[test]
    fn test_infer_rejects_ascending() {
        let err = infer_interval(&points(&[10, 20])).unwrap_err();
        assert!(matches!(err, DataError::CorruptData(_)));
    }
}
