use crate::error::CoreError;
use crate::lookback::Lookback;

/// Leaf size below which a range is reduced directly.
pub const DEFAULT_LEAF_THRESHOLD: usize = 8192;

/// Sampling interval observed in the reference feeds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 10;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// How windows are computed
    #[serde(default)]
    pub strategy: ReduceStrategy,
    /// Leaf size for the fork-join reducer
    #[serde(default = "default_leaf_threshold")]
    pub leaf_threshold: usize,
    /// Worker threads (`None` = available parallelism)
    #[serde(default)]
    pub threads: Option<usize>,
    /// Fork depth after which the reducer recurses sequentially
    /// (`None` = derived from the thread count)
    #[serde(default)]
    pub max_fork_depth: Option<usize>,
    /// Window boundary lookup
    #[serde(default)]
    pub slicer: SlicerConfig,
    /// Requested trailing windows
    #[serde(default = "Lookback::defaults")]
    pub lookbacks: Vec<Lookback>,
}

fn default_leaf_threshold() -> usize {
    DEFAULT_LEAF_THRESHOLD
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: ReduceStrategy::default(),
            leaf_threshold: default_leaf_threshold(),
            threads: None,
            max_fork_depth: None,
            slicer: SlicerConfig::default(),
            lookbacks: Lookback::defaults(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    /// - [`CoreError::Json`] when the document does not deserialize.
    /// - [`CoreError::Config`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// - [`CoreError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.leaf_threshold == 0 {
            return Err(CoreError::Config("leaf_threshold must be > 0".to_string()));
        }
        if self.threads == Some(0) {
            return Err(CoreError::Config("threads must be > 0".to_string()));
        }
        if let SlicerConfig::Uniform { interval_ms } = self.slicer
            && interval_ms == 0
        {
            return Err(CoreError::Config(
                "slicer.uniform.interval_ms must be > 0".to_string(),
            ));
        }
        if self.lookbacks.is_empty() {
            return Err(CoreError::Config("lookbacks is empty".to_string()));
        }
        Ok(())
    }
}

/// Window computation strategy. All variants produce the same results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceStrategy {
    /// Slice and reduce each window on the calling thread
    Sequential,
    /// Slice each window, fork-join reduce, windows run concurrently
    Parallel,
    /// One pass over disjoint chunks, merged cumulatively
    #[default]
    Incremental,
}

impl std::str::FromStr for ReduceStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(ReduceStrategy::Sequential),
            "parallel" => Ok(ReduceStrategy::Parallel),
            "incremental" => Ok(ReduceStrategy::Incremental),
            other => Err(CoreError::Config(format!("unknown strategy: {other}"))),
        }
    }
}

/// Window boundary lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlicerConfig {
    /// Scan until the first point older than the cutoff
    #[default]
    Linear,
    /// Compute the boundary from a fixed sampling interval
    Uniform {
        /// Spacing between consecutive points
        interval_ms: u64,
    },
}
