//! Trailing-window boundary lookup.

use ratewin_types::{Point, Series, SlicerConfig};

/// Finds where a window with a given cutoff ends inside a newest-first
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slicer {
    /// Scan from the newest point until one is older than the cutoff.
    /// Correct for any descending series; O(n).
    #[default]
    Linear,
    /// Derive the boundary from the newest timestamp and a fixed spacing.
    /// O(1), but only correct when the series has no gaps and every pair
    /// of neighbours is exactly `interval_ms` apart. A gap makes the
    /// window silently too long.
    Uniform {
        /// Spacing between consecutive points
        interval_ms: u64,
    },
}

impl Slicer {
    /// Number of leading points with `timestamp >= cutoff`.
    #[must_use]
    pub fn boundary(&self, points: &[Point], cutoff: u64) -> usize {
        match *self {
            Slicer::Linear => linear_boundary(points, cutoff),
            Slicer::Uniform { interval_ms } => {
                let Some(newest) = points.first() else {
                    return 0;
                };
                if cutoff > newest.timestamp {
                    return 0;
                }
                match (newest.timestamp - cutoff).checked_div(interval_ms) {
                    Some(steps) => usize::try_from(steps)
                        .map_or(points.len(), |s| s.saturating_add(1).min(points.len())),
                    None => linear_boundary(points, cutoff),
                }
            }
        }
    }

    /// Prefix of `series` newer than or at `cutoff`. Shares storage with
    /// the input.
    #[must_use]
    pub fn slice(&self, series: &Series, cutoff: u64) -> Series {
        series.head(self.boundary(series, cutoff))
    }
}

impl From<SlicerConfig> for Slicer {
    fn from(config: SlicerConfig) -> Self {
        match config {
            SlicerConfig::Linear => Slicer::Linear,
            SlicerConfig::Uniform { interval_ms } => Slicer::Uniform { interval_ms },
        }
    }
}

/// Prefix of `series` whose timestamps are all `>= cutoff`, found by
/// linear scan.
#[must_use]
pub fn slice_by_time(series: &Series, cutoff: u64) -> Series {
    Slicer::Linear.slice(series, cutoff)
}

fn linear_boundary(points: &[Point], cutoff: u64) -> usize {
    points
        .iter()
        .position(|p| p.timestamp < cutoff)
        .unwrap_or(points.len())
}
