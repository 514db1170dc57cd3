//! Shared, read-only view over an ordered run of points.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::point::Point;

/// Ordered sequence of points, newest first (index 0 = most recent).
///
/// A `Series` is a view (`start..end`) into a reference-counted backing
/// array. Cloning and slicing never copy points, so sub-ranges can be
/// handed to worker threads freely. The backing array is never mutated
/// after construction.
///
/// The descending-timestamp order is a caller contract; use the data
/// crate's validation helpers to enforce it at ingestion.
#[derive(Clone)]
pub struct Series {
    points: Arc<[Point]>,
    start: usize,
    end: usize,
}

impl Series {
    /// Builds a series from points that are already newest-first.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        let end = points.len();
        Self {
            points: points.into(),
            start: 0,
            end,
        }
    }

    /// Returns an empty series.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_points(Vec::new())
    }

    /// Points visible through this view.
    #[must_use]
    pub fn as_slice(&self) -> &[Point] {
        &self.points[self.start..self.end]
    }

    /// Sub-view `[from, to)` relative to this view. Bounds are clamped to
    /// the view length.
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let len = self.end - self.start;
        let to = to.min(len);
        let from = from.min(to);
        Self {
            points: Arc::clone(&self.points),
            start: self.start + from,
            end: self.start + to,
        }
    }

    /// The first `len` points (the newest ones).
    #[must_use]
    pub fn head(&self, len: usize) -> Self {
        self.slice(0, len)
    }

    /// Splits into the newer `[0, mid)` and older `[mid, len)` halves.
    #[must_use]
    pub fn split_at(&self, mid: usize) -> (Self, Self) {
        (self.slice(0, mid), self.slice(mid, usize::MAX))
    }

    /// Most recent point.
    #[must_use]
    pub fn newest(&self) -> Option<&Point> {
        self.as_slice().first()
    }

    /// Oldest point.
    #[must_use]
    pub fn oldest(&self) -> Option<&Point> {
        self.as_slice().last()
    }

    /// Returns true when both views share the same backing array.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Series) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl Deref for Series {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        self.as_slice()
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("len", &self.len())
            .field("newest", &self.newest().map(|p| p.timestamp))
            .field("oldest", &self.oldest().map(|p| p.timestamp))
            .finish()
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        Series::from_points(vec![
            Point::new(3.0, 30),
            Point::new(1.0, 20),
            Point::new(2.0, 10),
        ])
    }

    #[test]
    fn test_slice_shares_storage() {
        let series = sample();
        let head = series.head(2);
        assert_eq!(head.len(), 2);
        assert!(head.shares_storage_with(&series));
        assert_eq!(head.newest().map(|p| p.timestamp), Some(30));
        assert_eq!(head.oldest().map(|p| p.timestamp), Some(20));
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let series = sample();
        assert_eq!(series.slice(1, 99).len(), 2);
        assert!(series.slice(5, 2).is_empty());
        assert_eq!(series.head(10).len(), 3);
    }

    #[test]
    fn test_nested_slice_is_relative() {
        let series = sample();
        let tail = series.slice(1, 3);
        let inner = tail.slice(1, 2);
        assert_eq!(inner.as_slice(), &[Point::new(2.0, 10)]);
    }

    #[test]
    fn test_split_at_orders_newer_first() {
        let (newer, older) = sample().split_at(1);
        assert_eq!(newer.as_slice(), &[Point::new(3.0, 30)]);
        assert_eq!(older.len(), 2);
        assert_eq!(older.newest().map(|p| p.timestamp), Some(20));
    }

    #[test]
    fn test_empty_series() {
        let series = Series::empty();
        assert!(series.is_empty());
        assert!(series.newest().is_none());
        assert!(series.oldest().is_none());
    }
}
