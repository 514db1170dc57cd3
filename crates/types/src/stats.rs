//! Window aggregate and its merge algebra.

use crate::error::CoreError;
use crate::point::Point;

/// OHLC-style summary of one contiguous, newest-first run of points.
///
/// `sum` and `count` travel with the public fields so that two partial
/// aggregates of different sizes merge into an exact average.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    /// Rate of the chronologically oldest point
    pub open: f64,
    /// Rate of the chronologically newest point
    pub close: f64,
    /// Maximum rate
    pub high: f64,
    /// Minimum rate
    pub low: f64,
    /// Arithmetic mean of all rates
    pub average: f64,
    sum: f64,
    count: usize,
}

impl Stats {
    /// Reduces a newest-first run of points in a single linear pass.
    ///
    /// # Errors
    /// - [`CoreError::EmptyRange`] when `points` is empty.
    pub fn from_points(points: &[Point]) -> Result<Self, CoreError> {
        let (newest, oldest) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(CoreError::EmptyRange),
        };

        let mut high = f64::MIN;
        let mut low = f64::MAX;
        let mut sum = 0.0;
        for p in points {
            high = high.max(p.rate);
            low = low.min(p.rate);
            sum += p.rate;
        }

        let count = points.len();
        Ok(Self {
            open: oldest.rate,
            close: newest.rate,
            high,
            low,
            average: sum / count_as_f64(count),
            sum,
            count,
        })
    }

    /// Combines `self` (the newer range) with `older`, the range directly
    /// preceding it in time.
    ///
    /// `open`/`close` depend on argument order; every other field does not.
    #[must_use]
    pub fn merge(&self, older: &Stats) -> Stats {
        let sum = self.sum + older.sum;
        let count = self.count + older.count;
        Stats {
            open: older.open,
            close: self.close,
            high: self.high.max(older.high),
            low: self.low.min(older.low),
            average: sum / count_as_f64(count),
            sum,
            count,
        }
    }

    /// Merge where a missing side is the identity.
    #[must_use]
    pub fn merge_opt(newer: Option<Stats>, older: Option<Stats>) -> Option<Stats> {
        match (newer, older) {
            (Some(n), Some(o)) => Some(n.merge(&o)),
            (Some(n), None) => Some(n),
            (None, o) => o,
        }
    }

    /// Sum of all rates.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of points summarised.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Field-wise comparison with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Stats, eps: f64) -> bool {
        self.count == other.count
            && (self.open - other.open).abs() <= eps
            && (self.close - other.close).abs() <= eps
            && (self.high - other.high).abs() <= eps
            && (self.low - other.low).abs() <= eps
            && (self.average - other.average).abs() <= eps
            && (self.sum - other.sum).abs() <= eps * count_as_f64(self.count.max(1))
    }
}

#[allow(clippy::cast_precision_loss)] // point counts stay far below 2^52
fn count_as_f64(count: usize) -> f64 {
    count as f64
}
