//! ratewin Engine
//!
//! Trailing-window aggregation over newest-first rate series.
//!
//! # Features
//! - Window slicing by linear scan or fixed-interval arithmetic
//! - Fork-join reduction with a bounded fork depth on a rayon pool
//! - Nested windows in a single linear pass
//! - Scatter-gather runner streaming named results as they complete
//! - Strategy dispatch selected from [`ratewin_types::EngineConfig`]

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

/// Strategy dispatch and worker pool ownership.
pub mod engine;
/// Engine error types.
pub mod error;
/// Single-pass nested window aggregation.
pub mod incremental;
/// Fork-join reducer.
pub mod reducer;
/// Scatter-gather task runner.
pub mod scatter;
/// Window boundary lookup.
pub mod slicer;

/// Re-export: strategy dispatcher.
pub use engine::{WindowEngine, WindowReport};
/// Re-export: engine error type.
pub use error::EngineError;
/// Re-export: nested window aggregation.
pub use incremental::compute_nested_windows;
/// Re-export: fork-join reducer.
pub use reducer::{Reducer, fork_depth_for, reduce};
/// Re-export: scatter-gather runner.
pub use scatter::{Gather, Task, TaskOutcome, run_all};
/// Re-export: window slicing.
pub use slicer::{Slicer, slice_by_time};
