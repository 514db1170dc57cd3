//! Nested trailing windows in one pass.
//!
//! For cutoffs `c0 > c1 > ... > cn` (newest first) the series is cut into
//! disjoint chunks `[b(i-1), b(i))`, where `b(i)` is the window boundary
//! of `ci`. Every chunk is reduced once, all chunks in parallel, and the
//! window for `ci` is the running merge of chunks `0..=i`. Total work is
//! linear in the series length no matter how many windows are requested.

use std::collections::BTreeMap;

use rayon::prelude::*;
use ratewin_types::{Series, Stats};

use crate::error::EngineError;
use crate::reducer::Reducer;
use crate::slicer::Slicer;

/// Computes the aggregate of every window `series[t >= cutoff]`.
///
/// Duplicate cutoffs collapse into one entry. Cutoffs older than the
/// oldest point clamp to the series end; chunks left empty by closely
/// spaced cutoffs leave the running aggregate unchanged.
///
/// # Errors
/// - [`EngineError::EmptyWindow`] when a window holds no points at all
///   (its cutoff is newer than the newest point).
pub fn compute_nested_windows(
    series: &Series,
    cutoffs: &[u64],
    slicer: Slicer,
    reducer: &Reducer,
) -> Result<BTreeMap<u64, Stats>, EngineError> {
    let mut ordered = cutoffs.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.dedup();

    let chunks = chunk_bounds(series, &ordered, slicer);

    let partials = chunks
        .par_iter()
        .map(|&(from, to)| {
            if from == to {
                Ok(None)
            } else {
                reducer.reduce(&series[from..to]).map(Some)
            }
        })
        .collect::<Result<Vec<Option<Stats>>, EngineError>>()?;

    let mut windows = BTreeMap::new();
    let mut cumulative: Option<Stats> = None;
    for (&cutoff_ms, chunk) in ordered.iter().zip(partials) {
        // cumulative covers newer points than chunk
        cumulative = Stats::merge_opt(cumulative, chunk);
        let stats = cumulative.ok_or(EngineError::EmptyWindow { cutoff_ms })?;
        windows.insert(cutoff_ms, stats);
    }

    tracing::debug!(
        windows = windows.len(),
        points = chunks.last().map_or(0, |&(_, end)| end),
        "nested windows reduced"
    );

    Ok(windows)
}

/// `[from, to)` index ranges, one per cutoff, for cutoffs sorted newest
/// first.
fn chunk_bounds(series: &Series, ordered: &[u64], slicer: Slicer) -> Vec<(usize, usize)> {
    let mut bounds = Vec::with_capacity(ordered.len());
    let mut from = 0usize;
    for &cutoff in ordered {
        let to = slicer.boundary(series, cutoff).clamp(from, series.len());
        bounds.push((from, to));
        from = to;
    }
    bounds
}
