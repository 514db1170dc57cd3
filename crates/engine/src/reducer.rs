//! Fork-join reduction of one range into one [`Stats`].

use ratewin_types::{CoreError, DEFAULT_LEAF_THRESHOLD, EngineConfig, Point, Stats};

use crate::error::EngineError;

/// Divide-and-conquer reducer.
///
/// Ranges longer than `leaf_threshold` are split at the midpoint; the
/// newer half `[..mid]` and the older half `[mid..]` are reduced with
/// [`rayon::join`] and merged by position, so completion order never
/// affects `open`/`close`. Past `max_fork_depth` splitting continues on
/// the current thread, which keeps the number of queued jobs bounded
/// while producing bit-identical results to the fully forked run.
///
/// Jobs run on whichever rayon pool the caller is installed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reducer {
    leaf_threshold: usize,
    max_fork_depth: usize,
}

impl Default for Reducer {
    fn default() -> Self {
        Self {
            leaf_threshold: DEFAULT_LEAF_THRESHOLD,
            max_fork_depth: fork_depth_for(rayon::current_num_threads()),
        }
    }
}

impl Reducer {
    /// Creates a reducer.
    ///
    /// # Errors
    /// - [`EngineError::InvalidConfig`] when `leaf_threshold` is zero.
    pub fn new(leaf_threshold: usize, max_fork_depth: usize) -> Result<Self, EngineError> {
        if leaf_threshold == 0 {
            return Err(EngineError::invalid_config("leaf_threshold must be > 0"));
        }
        Ok(Self {
            leaf_threshold,
            max_fork_depth,
        })
    }

    /// Builds a reducer for a pool of `threads` workers.
    ///
    /// # Errors
    /// - [`EngineError::InvalidConfig`] when `leaf_threshold` is zero.
    pub fn from_config(config: &EngineConfig, threads: usize) -> Result<Self, EngineError> {
        Self::new(
            config.leaf_threshold,
            config
                .max_fork_depth
                .unwrap_or_else(|| fork_depth_for(threads)),
        )
    }

    /// Leaf size.
    #[must_use]
    pub fn leaf_threshold(&self) -> usize {
        self.leaf_threshold
    }

    /// Maximum depth at which halves are still forked.
    #[must_use]
    pub fn max_fork_depth(&self) -> usize {
        self.max_fork_depth
    }

    /// Reduces a newest-first range.
    ///
    /// # Errors
    /// - [`EngineError::Core`] wrapping [`CoreError::EmptyRange`] for an
    ///   empty range.
    pub fn reduce(&self, points: &[Point]) -> Result<Stats, EngineError> {
        if points.is_empty() {
            return Err(CoreError::EmptyRange.into());
        }
        Ok(self.reduce_at(points, 0)?)
    }

    fn reduce_at(&self, points: &[Point], depth: usize) -> Result<Stats, CoreError> {
        if points.len() <= self.leaf_threshold {
            return Stats::from_points(points);
        }

        let (newer, older) = points.split_at(points.len() / 2);
        let (newer, older) = if depth < self.max_fork_depth {
            rayon::join(
                || self.reduce_at(newer, depth + 1),
                || self.reduce_at(older, depth + 1),
            )
        } else {
            (
                self.reduce_at(newer, depth + 1),
                self.reduce_at(older, depth + 1),
            )
        };

        Ok(newer?.merge(&older?))
    }
}

/// Reduces `points` with the default reducer on the current pool.
///
/// # Errors
/// - [`EngineError::Core`] for an empty range.
pub fn reduce(points: &[Point]) -> Result<Stats, EngineError> {
    Reducer::default().reduce(points)
}

/// Fork depth giving roughly four jobs per worker.
#[must_use]
pub fn fork_depth_for(threads: usize) -> usize {
    threads.max(1).next_power_of_two().trailing_zeros() as usize + 2
}
