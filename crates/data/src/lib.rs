//! ratewin Data
//!
//! JSON and binary loading, series validation, gap analysis and a
//! content-hash cache for rate series.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

/// Content-hash series cache.
pub mod cache;
/// Fixed-width binary point codec.
pub mod codec;
/// Data-layer error types.
pub mod error;
/// Gap analysis and statistics.
pub mod gaps;
/// JSON/binary loading and series construction.
pub mod loader;
/// Series validation helpers.
pub mod validation;

/// Re-export: series cache and sync result.
pub use cache::{SeriesCache, SeriesSource, SyncOutcome};
/// Re-export: resolve cache directory.
pub use cache::resolve_cache_dir;
/// Re-export: content hash helper.
pub use cache::sha256_hex;
/// Re-export: binary codec.
pub use codec::{RECORD_LEN, decode_binary, encode_binary};
/// Re-export: data-layer error type.
pub use error::DataError;
/// Re-export: gap analysis result stats.
pub use gaps::GapStats;
/// Re-export: gap analysis.
pub use gaps::analyze_gaps;
/// Re-export: source format selector.
pub use loader::SourceFormat;
/// Re-export: order points into a series.
pub use loader::into_series;
/// Re-export: load, order and validate a series.
pub use loader::load_and_validate;
/// Re-export: load points from JSON.
pub use loader::{load_json, parse_json};
/// Re-export: load points in any supported format.
pub use loader::{load_points, parse_points};
/// Re-export: interval inference.
pub use validation::infer_interval;
/// Re-export: series validation.
pub use validation::validate_series;
