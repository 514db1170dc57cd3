//! Gap analysis for sampled rate series.

use crate::error::DataError;
use ratewin_types::Point;

/// Share of missing samples above which a warning is logged.
pub const GAP_WARN_THRESHOLD: f64 = 0.05;

/// Statistics describing missing samples on a fixed grid.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GapStats {
    /// Number of grid slots between the newest and oldest point, inclusive.
    pub expected_points: usize,
    /// Number of grid slots with no point.
    pub missing_points: usize,
    /// Missing points divided by expected points.
    pub gap_loss: f64,
}

impl GapStats {
    /// True when no grid slot is empty.
    #[must_use]
    pub fn is_gap_free(&self) -> bool {
        self.missing_points == 0
    }
}

/// Analyze gaps in a newest-first series sampled every `interval_ms`.
///
/// The grid is anchored at the newest point. Points that fall between
/// grid slots are ignored; nothing is interpolated.
///
/// # Errors
/// - [`DataError::EmptyData`] when `points` is empty.
/// - [`DataError::CorruptData`] when `interval_ms` is zero or the series
///   is not ordered newest first.
pub fn analyze_gaps(points: &[Point], interval_ms: u64) -> Result<GapStats, DataError> {
    let (Some(newest), Some(oldest)) = (points.first(), points.last()) else {
        return Err(DataError::EmptyData);
    };

    if interval_ms == 0 {
        return Err(DataError::CorruptData(
            "Invalid sample interval (ms): 0".to_string(),
        ));
    }

    let span = newest.timestamp.checked_sub(oldest.timestamp).ok_or_else(|| {
        DataError::CorruptData(format!(
            "Oldest point is newer than newest: {} > {}",
            oldest.timestamp, newest.timestamp
        ))
    })?;

    let expected_points = count_from_u64(span / interval_ms + 1, "expected_points")?;
    let on_grid = points
        .iter()
        .filter(|p| (newest.timestamp - p.timestamp.min(newest.timestamp)) % interval_ms == 0)
        .count();
    let missing_points = expected_points.saturating_sub(on_grid);

    let gap_loss = count_to_f64(missing_points) / count_to_f64(expected_points);

    if gap_loss > GAP_WARN_THRESHOLD {
        tracing::warn!(
            "Large gaps detected: {} missing points ({:.2}%)",
            missing_points,
            gap_loss * 100.0
        );
    }

    Ok(GapStats {
        expected_points,
        missing_points,
        gap_loss,
    })
}

fn count_from_u64(value: u64, label: &str) -> Result<usize, DataError> {
    usize::try_from(value)
        .map_err(|_| DataError::CorruptData(format!("Count overflow for {label}: {value}")))
}

#[allow(clippy::cast_precision_loss)]
fn count_to_f64(value: usize) -> f64 {
    value as f64
}
