use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Trailing window length, measured back from an anchor timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lookback {
    millis: u64,
}

/// Error parsing lookback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLookbackError(String);

impl fmt::Display for ParseLookbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid lookback string: {:?}", self.0)
    }
}

impl std::error::Error for ParseLookbackError {}

impl Lookback {
    /// Lookback of `amount` milliseconds
    #[must_use]
    pub const fn millis(amount: u64) -> Self {
        Self { millis: amount }
    }

    /// Lookback of `amount` seconds
    #[must_use]
    pub const fn seconds(amount: u64) -> Self {
        Self::millis(amount * MS_PER_SECOND)
    }

    /// Lookback of `amount` minutes
    #[must_use]
    pub const fn minutes(amount: u64) -> Self {
        Self::millis(amount * MS_PER_MINUTE)
    }

    /// Lookback of `amount` hours
    #[must_use]
    pub const fn hours(amount: u64) -> Self {
        Self::millis(amount * MS_PER_HOUR)
    }

    /// Duration in milliseconds
    #[must_use]
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Absolute cutoff timestamp for a window ending at `anchor_ms`.
    /// Saturates at 0 for lookbacks longer than the epoch offset.
    #[must_use]
    pub fn cutoff(&self, anchor_ms: u64) -> u64 {
        anchor_ms.saturating_sub(self.millis)
    }

    /// The four default windows: 5m, 30m, 4h, 24h.
    #[must_use]
    pub fn defaults() -> Vec<Lookback> {
        vec![
            Lookback::minutes(5),
            Lookback::minutes(30),
            Lookback::hours(4),
            Lookback::hours(24),
        ]
    }
}

impl std::str::FromStr for Lookback {
    type Err = ParseLookbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let err = || ParseLookbackError(s.to_string());

        let (digits, unit) = match trimmed.strip_suffix("ms") {
            Some(digits) => (digits, 1),
            None => {
                let (split, _) = trimmed.char_indices().last().ok_or_else(err)?;
                let (digits, suffix) = trimmed.split_at(split);
                let unit = match suffix {
                    "s" => MS_PER_SECOND,
                    "m" => MS_PER_MINUTE,
                    "h" => MS_PER_HOUR,
                    "d" => MS_PER_DAY,
                    _ => return Err(err()),
                };
                (digits, unit)
            }
        };

        let amount: u64 = digits.parse().map_err(|_| err())?;
        if amount == 0 {
            return Err(err());
        }
        amount.checked_mul(unit).map(Lookback::millis).ok_or_else(err)
    }
}

impl TryFrom<String> for Lookback {
    type Error = ParseLookbackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis;
        if ms % MS_PER_HOUR == 0 && ms > 0 {
            write!(f, "{}h", ms / MS_PER_HOUR)
        } else if ms % MS_PER_MINUTE == 0 && ms > 0 {
            write!(f, "{}m", ms / MS_PER_MINUTE)
        } else if ms % MS_PER_SECOND == 0 && ms > 0 {
            write!(f, "{}s", ms / MS_PER_SECOND)
        } else {
            write!(f, "{ms}ms")
        }
    }
}
