//! ratewin Types
//!
//! Core data structures for the ratewin window engine.
//! This crate provides the rate point, the shared series view, the
//! mergeable window aggregate, lookback durations, and engine configuration.

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod lookback;
pub mod point;
pub mod series;
pub mod stats;

// Re-export main types for convenience
pub use config::{
    DEFAULT_LEAF_THRESHOLD, DEFAULT_SAMPLE_INTERVAL_MS, EngineConfig, ReduceStrategy, SlicerConfig,
};
pub use error::CoreError;
pub use lookback::{Lookback, ParseLookbackError};
pub use point::Point;
pub use series::Series;
pub use stats::Stats;
