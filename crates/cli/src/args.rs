use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ratewin_data::SourceFormat;
use ratewin_types::{DEFAULT_SAMPLE_INTERVAL_MS, EngineConfig, Lookback, ReduceStrategy};

#[derive(Debug, Parser)]
#[command(
    name = "ratewin",
    version,
    about = "Trailing-window rate aggregates over a newest-first series"
)]
pub struct Cli {
    /// Path to the rate series (JSON array or binary records)
    #[arg(long)]
    pub input: PathBuf,

    /// Input encoding. If omitted, inferred from the file extension.
    #[arg(long)]
    pub format: Option<SourceFormat>,

    /// Comma-separated lookbacks, e.g. "5m,30m,4h,24h".
    /// If omitted, taken from --config (default 5m,30m,4h,24h).
    #[arg(long, value_delimiter = ',')]
    pub windows: Option<Vec<Lookback>>,

    /// Anchor timestamp (epoch-ms) the lookbacks are measured from.
    /// Defaults to the newest point in the series.
    #[arg(long)]
    pub anchor_ms: Option<u64>,

    /// sequential | parallel | incremental
    #[arg(long)]
    pub strategy: Option<ReduceStrategy>,

    /// Leaf size for the fork-join reducer
    #[arg(long)]
    pub leaf_threshold: Option<usize>,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Use interval arithmetic for window boundaries. The series must
    /// have a single common spacing or the run fails.
    #[arg(long, default_value_t = false)]
    pub uniform: bool,

    /// Expected sampling interval used for the gap report
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_MS)]
    pub sample_interval_ms: u64,

    /// Reuse decoded series across runs, keyed by source content hash
    #[arg(long, default_value_t = false)]
    pub cache: bool,

    /// Cache directory (implies --cache). Falls back to $RATEWIN_CACHE_DIR.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// JSON engine configuration; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Input format from the flag or the file extension.
    pub fn source_format(&self) -> Result<SourceFormat> {
        self.format
            .or_else(|| SourceFormat::from_path(&self.input))
            .with_context(|| {
                format!(
                    "cannot infer format of {}; pass --format json|bin",
                    self.input.display()
                )
            })
    }

    /// Whether the content-hash cache is enabled.
    pub fn cache_enabled(&self) -> bool {
        self.cache || self.cache_dir.is_some()
    }

    /// Engine configuration: `--config` file (or defaults) overlaid with flags.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read config {}", path.display()))?;
                EngineConfig::from_json_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => EngineConfig::default(),
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(leaf_threshold) = self.leaf_threshold {
            config.leaf_threshold = leaf_threshold;
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
        if let Some(windows) = &self.windows {
            config.lookbacks.clone_from(windows);
        }

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratewin_types::SlicerConfig;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["ratewin"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--input", "data.json"]);
        assert_eq!(cli.source_format().unwrap(), SourceFormat::Json);
        assert!(!cli.cache_enabled());
        assert_eq!(cli.sample_interval_ms, 10);

        let config = cli.engine_config().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--input",
            "rates.bin",
            "--windows",
            "90s,2h",
            "--strategy",
            "parallel",
            "--leaf-threshold",
            "64",
            "--threads",
            "3",
        ]);
        assert_eq!(cli.source_format().unwrap(), SourceFormat::Bin);

        let config = cli.engine_config().unwrap();
        assert_eq!(config.strategy, ReduceStrategy::Parallel);
        assert_eq!(config.leaf_threshold, 64);
        assert_eq!(config.threads, Some(3));
        assert_eq!(
            config.lookbacks,
            vec![Lookback::seconds(90), Lookback::hours(2)]
        );
    }

    #[test]
    fn test_config_file_layered_under_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(
            &path,
            r#"{"strategy": "sequential", "leaf_threshold": 128, "lookbacks": ["1m"]}"#,
        )
        .unwrap();

        let cli = parse(&[
            "--input",
            "data.json",
            "--config",
            path.to_str().unwrap(),
            "--leaf-threshold",
            "256",
        ]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config.strategy, ReduceStrategy::Sequential);
        assert_eq!(config.leaf_threshold, 256);
        assert_eq!(config.lookbacks, vec![Lookback::minutes(1)]);
        assert_eq!(config.slicer, SlicerConfig::Linear);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let argv = ["ratewin", "--input", "d.json", "--windows", "5x"];
        assert!(Cli::try_parse_from(argv).is_err());

        let argv = ["ratewin", "--input", "d.json", "--strategy", "magic"];
        assert!(Cli::try_parse_from(argv).is_err());

        let cli = parse(&["--input", "d.json", "--threads", "0"]);
        assert!(cli.engine_config().is_err());
    }

    #[test]
    fn test_unknown_extension_needs_format() {
        let cli = parse(&["--input", "rates.csv"]);
        assert!(cli.source_format().is_err());

        let cli = parse(&["--input", "rates.csv", "--format", "json"]);
        assert_eq!(cli.source_format().unwrap(), SourceFormat::Json);
    }

    #[test]
    fn test_cache_dir_implies_cache() {
        let cli = parse(&["--input", "d.json", "--cache-dir", "/tmp/c"]);
        assert!(cli.cache_enabled());
    }
}
