/// A single rate observation.
/// `timestamp` is milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Observed rate
    pub rate: f64,
    /// Unix epoch milliseconds UTC
    pub timestamp: u64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(rate: f64, timestamp: u64) -> Self {
        Self { rate, timestamp }
    }
}
