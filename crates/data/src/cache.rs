//! Content-hash cache for decoded series.
//!
//! A source file is identified by the SHA-256 of its raw bytes. The
//! decoded, ordered series is stored next to that hash in binary form, so
//! an unchanged source is loaded from `<name>.bin` without reparsing it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use sha2::{Digest, Sha256};

use crate::codec::{decode_binary, encode_binary};
use crate::error::DataError;
use crate::loader::{SourceFormat, into_series, parse_points, read_source};
use crate::validation::validate_series;
use ratewin_types::Series;

/// Environment variable overriding the default cache directory.
pub const CACHE_DIR_ENV: &str = "RATEWIN_CACHE_DIR";

/// Cache directory used when neither a path nor the env override is given.
pub const DEFAULT_CACHE_DIR: &str = ".ratewin-cache";

/// Resolve the cache directory: explicit path, then env override, then default.
#[must_use]
pub fn resolve_cache_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(CACHE_DIR_ENV).map_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR), PathBuf::from)
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Which branch of [`SeriesCache::sync`] produced the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    /// Source changed (or was never seen); parsed and written to the cache.
    Fresh,
    /// Source hash matched; loaded from the cache.
    Cached,
}

impl fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fresh => "fresh",
            Self::Cached => "cached",
        })
    }
}

/// Result of [`SeriesCache::sync`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Validated newest-first series
    pub series: Series,
    /// Branch that produced it
    pub source: SeriesSource,
    /// Content hash of the source file
    pub hash: String,
}

/// Directory-backed series cache.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    root: PathBuf,
}

impl SeriesCache {
    /// Opens (and creates if needed) a cache rooted at `root`.
    ///
    /// # Errors
    /// - [`DataError::Cache`] when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DataError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            DataError::Cache(format!("cannot create {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the stored hash for `source_path`.
    #[must_use]
    pub fn hash_path(&self, source_path: &Path) -> PathBuf {
        self.entry_path(source_path, "sha256")
    }

    /// Path of the stored series for `source_path`.
    #[must_use]
    pub fn data_path(&self, source_path: &Path) -> PathBuf {
        self.entry_path(source_path, "bin")
    }

    /// Returns the series for `source_path`, reusing the cached copy when
    /// the source bytes are unchanged.
    ///
    /// A damaged cache entry is logged and rebuilt rather than returned.
    ///
    /// # Errors
    /// - [`DataError::FileNotFound`] when the source cannot be read.
    /// - Parse and validation errors of a fresh source.
    /// - [`DataError::Cache`] when a fresh entry cannot be written.
    pub fn sync(&self, source_path: &Path, format: SourceFormat) -> Result<SyncOutcome, DataError> {
        let started = Instant::now();
        let bytes = read_source(source_path)?;
        let hash = sha256_hex(&bytes);

        if self.stored_hash(source_path).as_deref() == Some(hash.as_str()) {
            match self.read_entry(source_path) {
                Ok(series) => {
                    tracing::info!(
                        source = %source_path.display(),
                        points = series.len(),
                        elapsed_ms = started.elapsed().as_millis(),
                        "series loaded from cache"
                    );
                    return Ok(SyncOutcome {
                        series,
                        source: SeriesSource::Cached,
                        hash,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        source = %source_path.display(),
                        error = %err,
                        "cache entry unreadable, rebuilding"
                    );
                }
            }
        } else {
            tracing::warn!(source = %source_path.display(), "cache miss");
        }

        let series = into_series(parse_points(&bytes, format)?)?;
        validate_series(&series)?;
        self.write_entry(source_path, &series, &hash)?;

        tracing::info!(
            source = %source_path.display(),
            points = series.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "series parsed and cached"
        );

        Ok(SyncOutcome {
            series,
            source: SeriesSource::Fresh,
            hash,
        })
    }

    fn entry_path(&self, source_path: &Path, ext: &str) -> PathBuf {
        let name = source_path
            .file_name()
            .map_or_else(|| "series".into(), |n| n.to_string_lossy());
        self.root.join(format!("{name}.{ext}"))
    }

    fn stored_hash(&self, source_path: &Path) -> Option<String> {
        std::fs::read_to_string(self.hash_path(source_path))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn read_entry(&self, source_path: &Path) -> Result<Series, DataError> {
        let path = self.data_path(source_path);
        let bytes = std::fs::read(&path)
            .map_err(|e| DataError::Cache(format!("cannot read {}: {e}", path.display())))?;
        let series = into_series(decode_binary(&bytes)?)?;
        validate_series(&series)?;
        Ok(series)
    }

    /// Data first, hash last: a stored hash always describes the stored data.
    fn write_entry(&self, source_path: &Path, series: &Series, hash: &str) -> Result<(), DataError> {
        write_atomic(&self.data_path(source_path), &encode_binary(series))?;
        write_atomic(&self.hash_path(source_path), hash.as_bytes())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);
    std::fs::write(&tmp_path, bytes)
        .and_then(|()| std::fs::rename(&tmp_path, path))
        .map_err(|e| DataError::Cache(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_entry_paths_follow_source_name() {
        let cache = SeriesCache {
            root: PathBuf::from("/cache"),
        };
        assert_eq!(
            cache.hash_path(Path::new("/data/data.json")),
            PathBuf::from("/cache/data.json.sha256")
        );
        assert_eq!(
            cache.data_path(Path::new("data.json")),
            PathBuf::from("/cache/data.json.bin")
        );
    }

    #[test]
    fn test_series_source_display() {
        assert_eq!(SeriesSource::Fresh.to_string(), "fresh");
        assert_eq!(SeriesSource::Cached.to_string(), "cached");
    }
}
