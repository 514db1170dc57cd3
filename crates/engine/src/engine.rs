//! Strategy dispatch over the window computations.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use ratewin_types::{EngineConfig, Lookback, ReduceStrategy, Series, Stats};

use crate::error::EngineError;
use crate::incremental::compute_nested_windows;
use crate::reducer::Reducer;
use crate::scatter::{Task, run_all};
use crate::slicer::Slicer;

/// One trailing window in a report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WindowReport {
    /// Requested lookback
    pub lookback: Lookback,
    /// Absolute cutoff timestamp (epoch-ms)
    pub cutoff_ms: u64,
    /// Window aggregate
    pub stats: Stats,
}

/// Owns the worker pool and runs the configured strategy.
///
/// Every [`ReduceStrategy`] answers the same question, so switching
/// strategies changes only how the work is scheduled.
#[derive(Debug)]
pub struct WindowEngine {
    strategy: ReduceStrategy,
    slicer: Slicer,
    reducer: Reducer,
    pool: rayon::ThreadPool,
}

impl WindowEngine {
    /// Builds an engine and its worker pool.
    ///
    /// # Errors
    /// - [`EngineError::Core`] when the configuration fails validation.
    /// - [`EngineError::ThreadPool`] when the pool cannot be created.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("ratewin-worker-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        let reducer = Reducer::from_config(config, pool.current_num_threads())?;

        tracing::debug!(
            strategy = ?config.strategy,
            threads = pool.current_num_threads(),
            leaf_threshold = reducer.leaf_threshold(),
            max_fork_depth = reducer.max_fork_depth(),
            "window engine ready"
        );

        Ok(Self {
            strategy: config.strategy,
            slicer: config.slicer.into(),
            reducer,
            pool,
        })
    }

    /// Active strategy.
    #[must_use]
    pub fn strategy(&self) -> ReduceStrategy {
        self.strategy
    }

    /// Active slicer.
    #[must_use]
    pub fn slicer(&self) -> Slicer {
        self.slicer
    }

    /// Worker count of the owned pool.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Fork-join reduction of one range on the engine's pool.
    ///
    /// # Errors
    /// - [`EngineError::Core`] for an empty range.
    pub fn reduce(&self, series: &Series) -> Result<Stats, EngineError> {
        self.pool.install(|| self.reducer.reduce(series))
    }

    /// Aggregate for every cutoff, keyed by cutoff.
    ///
    /// # Errors
    /// - [`EngineError::EmptyWindow`] when any window holds no points.
    /// - Task failures from the parallel strategy.
    pub fn compute(
        &self,
        series: &Series,
        cutoffs: &[u64],
    ) -> Result<BTreeMap<u64, Stats>, EngineError> {
        let started = Instant::now();
        let windows = match self.strategy {
            ReduceStrategy::Sequential => self.compute_sequential(series, cutoffs),
            ReduceStrategy::Parallel => self.compute_parallel(series, cutoffs),
            ReduceStrategy::Incremental => self.pool.install(|| {
                compute_nested_windows(series, cutoffs, self.slicer, &self.reducer)
            }),
        }?;

        tracing::debug!(
            strategy = ?self.strategy,
            windows = windows.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "windows computed"
        );
        Ok(windows)
    }

    /// Resolves lookbacks against `anchor_ms` and computes them.
    /// Reports are returned in the order the lookbacks were given.
    ///
    /// # Errors
    /// Same as [`WindowEngine::compute`].
    pub fn compute_lookbacks(
        &self,
        series: &Series,
        anchor_ms: u64,
        lookbacks: &[Lookback],
    ) -> Result<Vec<WindowReport>, EngineError> {
        let cutoffs: Vec<u64> = lookbacks.iter().map(|lb| lb.cutoff(anchor_ms)).collect();
        let windows = self.compute(series, &cutoffs)?;

        lookbacks
            .iter()
            .zip(cutoffs)
            .map(|(&lookback, cutoff_ms)| {
                windows
                    .get(&cutoff_ms)
                    .map(|&stats| WindowReport {
                        lookback,
                        cutoff_ms,
                        stats,
                    })
                    .ok_or(EngineError::EmptyWindow { cutoff_ms })
            })
            .collect()
    }

    fn compute_sequential(
        &self,
        series: &Series,
        cutoffs: &[u64],
    ) -> Result<BTreeMap<u64, Stats>, EngineError> {
        let mut windows = BTreeMap::new();
        for &cutoff_ms in cutoffs {
            let window = self.slicer.slice(series, cutoff_ms);
            if window.is_empty() {
                return Err(EngineError::EmptyWindow { cutoff_ms });
            }
            windows.insert(cutoff_ms, Stats::from_points(&window)?);
        }
        Ok(windows)
    }

    fn compute_parallel(
        &self,
        series: &Series,
        cutoffs: &[u64],
    ) -> Result<BTreeMap<u64, Stats>, EngineError> {
        let mut by_name: HashMap<String, u64> = HashMap::with_capacity(cutoffs.len());
        let mut tasks = Vec::with_capacity(cutoffs.len());

        for &cutoff_ms in cutoffs {
            let name = cutoff_ms.to_string();
            if by_name.insert(name.clone(), cutoff_ms).is_some() {
                continue;
            }
            let series = series.clone();
            let slicer = self.slicer;
            let reducer = self.reducer;
            tasks.push(Task::new(name, move || {
                let window = slicer.slice(&series, cutoff_ms);
                if window.is_empty() {
                    return Err(EngineError::EmptyWindow { cutoff_ms });
                }
                reducer.reduce(&window)
            }));
        }

        let mut windows = BTreeMap::new();
        for outcome in run_all(&self.pool, tasks).wait_all()? {
            tracing::debug!(
                cutoff = %outcome.name,
                elapsed_us = outcome.elapsed.as_micros(),
                "window task finished"
            );
            if let Some(&cutoff_ms) = by_name.get(&outcome.name) {
                windows.insert(cutoff_ms, outcome.stats);
            }
        }
        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratewin_types::Point;

    fn config(strategy: ReduceStrategy) -> EngineConfig {
        EngineConfig {
            strategy,
            leaf_threshold: 4,
            threads: Some(2),
            ..EngineConfig::default()
        }
    }

    fn series(len: u64) -> Series {
        (0..len)
            .map(|i| Point::new((i % 13) as f64 + 0.5, 100_000 - i * 10))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_strategies_agree() {
        let series = series(500);
        let cutoffs = [99_900, 99_000, 97_000, 95_000];
        let expected = WindowEngine::new(&config(ReduceStrategy::Sequential))
            .unwrap()
            .compute(&series, &cutoffs)
            .unwrap();

        for strategy in [ReduceStrategy::Parallel, ReduceStrategy::Incremental] {
            let engine = WindowEngine::new(&config(strategy)).unwrap();
            let windows = engine.compute(&series, &cutoffs).unwrap();
            assert_eq!(windows.len(), expected.len());
            for (cutoff, stats) in &expected {
                assert!(windows[cutoff].approx_eq(stats, 1e-9), "{strategy:?} {cutoff}");
            }
        }
    }

    #[test]
    fn test_compute_lookbacks_preserves_request_order() {
        let series = series(100);
        let engine = WindowEngine::new(&config(ReduceStrategy::Incremental)).unwrap();
        let lookbacks = [Lookback::millis(500), Lookback::millis(50), Lookback::millis(200)];
        let reports = engine.compute_lookbacks(&series, 100_000, &lookbacks).unwrap();

        let order: Vec<_> = reports.iter().map(|r| r.lookback).collect();
        assert_eq!(order, lookbacks.to_vec());
        assert_eq!(reports[1].cutoff_ms, 99_950);
        assert_eq!(reports[1].stats.count(), 6);
    }

    #[test]
    fn test_empty_window_is_fatal_for_every_strategy() {
        let series = series(10);
        for strategy in [
            ReduceStrategy::Sequential,
            ReduceStrategy::Parallel,
            ReduceStrategy::Incremental,
        ] {
            let engine = WindowEngine::new(&config(strategy)).unwrap();
            let err = engine.compute(&series, &[100_001, 99_950]).unwrap_err();
            assert!(err.is_empty_input(), "{strategy:?}: {err}");
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = WindowEngine::new(&EngineConfig {
            leaf_threshold: 0,
            ..EngineConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));
    }

    #[test]
    fn test_reduce_on_engine_pool() {
        let engine = WindowEngine::new(&config(ReduceStrategy::Parallel)).unwrap();
        assert_eq!(engine.threads(), 2);
        let stats = engine.reduce(&series(64)).unwrap();
        assert_eq!(stats.count(), 64);
    }
}
