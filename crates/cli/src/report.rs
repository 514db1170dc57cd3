use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use ratewin_data::{
    GapStats, SeriesCache, SourceFormat, analyze_gaps, infer_interval, load_and_validate,
    resolve_cache_dir,
};
use ratewin_engine::{WindowEngine, WindowReport};
use ratewin_types::{ReduceStrategy, Series, SlicerConfig};

use crate::args::Cli;

/// JSON document printed by the binary.
#[derive(Debug, Serialize)]
pub struct Report {
    pub input: String,
    /// `fresh`, `cached` or `direct` (cache disabled)
    pub source: String,
    pub points: usize,
    pub newest_ms: u64,
    pub oldest_ms: u64,
    pub anchor_ms: u64,
    pub strategy: ReduceStrategy,
    pub slicer: SlicerConfig,
    pub threads: usize,
    pub gaps: GapStats,
    pub windows: Vec<WindowReport>,
}

pub fn run(cli: &Cli) -> Result<Report> {
    let mut config = cli.engine_config()?;
    let format = cli.source_format()?;

    let started = Instant::now();
    let (series, source) = load_series(cli, format)?;
    tracing::info!(
        points = series.len(),
        source = %source,
        elapsed_ms = started.elapsed().as_millis(),
        "series ready"
    );

    if cli.uniform {
        match infer_interval(&series).context("--uniform needs a series with one common spacing")? {
            Some(interval_ms) => config.slicer = SlicerConfig::Uniform { interval_ms },
            None => tracing::info!("single-point series, keeping linear slicer"),
        }
    }

    let gap_interval = match config.slicer {
        SlicerConfig::Uniform { interval_ms } => interval_ms,
        SlicerConfig::Linear => cli.sample_interval_ms,
    };
    let gaps = analyze_gaps(&series, gap_interval).context("gap analysis failed")?;

    let (newest_ms, oldest_ms) = match (series.newest(), series.oldest()) {
        (Some(newest), Some(oldest)) => (newest.timestamp, oldest.timestamp),
        _ => anyhow::bail!("series {} is empty", cli.input.display()),
    };
    let anchor_ms = cli.anchor_ms.unwrap_or(newest_ms);

    let engine = WindowEngine::new(&config)?;
    let started = Instant::now();
    let windows = engine
        .compute_lookbacks(&series, anchor_ms, &config.lookbacks)
        .with_context(|| format!("window computation failed (anchor {anchor_ms})"))?;

    tracing::info!(
        strategy = ?engine.strategy(),
        slicer = ?engine.slicer(),
        windows = windows.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "windows computed"
    );

    Ok(Report {
        input: cli.input.display().to_string(),
        source,
        points: series.len(),
        newest_ms,
        oldest_ms,
        anchor_ms,
        strategy: engine.strategy(),
        slicer: config.slicer,
        threads: engine.threads(),
        gaps,
        windows,
    })
}

fn load_series(cli: &Cli, format: SourceFormat) -> Result<(Series, String)> {
    if cli.cache_enabled() {
        let cache = SeriesCache::open(resolve_cache_dir(cli.cache_dir.as_deref()))?;
        let outcome = cache
            .sync(&cli.input, format)
            .with_context(|| format!("cannot load {}", cli.input.display()))?;
        return Ok((outcome.series, outcome.source.to_string()));
    }

    let series = load_and_validate(&cli.input, format)
        .with_context(|| format!("cannot load {}", cli.input.display()))?;
    Ok((series, "direct".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratewin_types::Point;
    use std::path::Path;

    const NEWEST: u64 = 1_616_761_301_000;

    fn write_series(path: &Path, len: u64, skip: Option<u64>) {
        let points: Vec<Point> = (0..len)
            .filter(|&i| Some(i) != skip)
            .map(|i| Point::new(100.0 + (i % 7) as f64, NEWEST - i * 10))
            .collect();
        std::fs::write(path, serde_json::to_vec(&points).unwrap()).unwrap();
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ratewin"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_uniform_windows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        write_series(&input, 1_000, None);

        let report = run(&cli(&[
            "--input",
            input.to_str().unwrap(),
            "--windows",
            "1s,5s",
            "--uniform",
            "--threads",
            "2",
        ]))
        .unwrap();

        assert_eq!(report.source, "direct");
        assert_eq!(report.points, 1_000);
        assert_eq!(report.anchor_ms, NEWEST);
        assert_eq!(report.slicer, SlicerConfig::Uniform { interval_ms: 10 });
        assert!(report.gaps.is_gap_free());
        assert_eq!(report.windows[0].cutoff_ms, NEWEST - 1_000);
        assert_eq!(report.windows[0].stats.count(), 101);
        assert_eq!(report.windows[1].stats.count(), 501);
    }

    #[test]
    fn test_run_uniform_rejects_gapped_series() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        write_series(&input, 100, Some(50));

        let err = run(&cli(&["--input", input.to_str().unwrap(), "--uniform"])).unwrap_err();
        assert!(err.to_string().contains("--uniform"));
    }

    #[test]
    fn test_run_linear_reports_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        write_series(&input, 100, Some(50));

        let report = run(&cli(&["--input", input.to_str().unwrap(), "--windows", "24h"])).unwrap();
        assert_eq!(report.slicer, SlicerConfig::Linear);
        assert_eq!(report.gaps.missing_points, 1);
        assert_eq!(report.windows[0].stats.count(), 99);
    }

    #[test]
    fn test_run_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        let cache_dir = dir.path().join("cache");
        write_series(&input, 200, None);
        let args = [
            "--input",
            input.to_str().unwrap(),
            "--cache-dir",
            cache_dir.to_str().unwrap(),
        ];

        let first = run(&cli(&args)).unwrap();
        let second = run(&cli(&args)).unwrap();
        assert_eq!(first.source, "fresh");
        assert_eq!(second.source, "cached");
        assert_eq!(first.windows, second.windows);
    }

    #[test]
    fn test_anchor_past_series_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        write_series(&input, 10, None);
        let anchor = (NEWEST + 10 * 60_000).to_string();

        let err = run(&cli(&[
            "--input",
            input.to_str().unwrap(),
            "--anchor-ms",
            &anchor,
            "--windows",
            "5m",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("window computation failed"));
    }
}
