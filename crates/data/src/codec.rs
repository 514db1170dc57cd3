//! Fixed-width binary encoding of rate points.
//!
//! Each point is one 16-byte little-endian record:
//!
//! | offset | type  | field       |
//! |--------|-------|-------------|
//! | 0      | `u64` | `timestamp` |
//! | 8      | `f64` | `rate`      |
//!
//! There is no header; the record count is the byte length divided by
//! [`RECORD_LEN`].

use rayon::prelude::*;

use crate::error::DataError;
use ratewin_types::Point;

/// Size of one encoded point in bytes.
pub const RECORD_LEN: usize = 16;

/// Records decoded per rayon job at minimum.
const MIN_RECORDS_PER_JOB: usize = 4096;

/// Decodes a buffer of records, splitting the work across the rayon pool.
///
/// Record order is preserved.
///
/// # Errors
/// - [`DataError::TruncatedRecord`] when the length is not a multiple of
///   [`RECORD_LEN`].
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<Point>, DataError> {
    let trailing = bytes.len() % RECORD_LEN;
    if trailing != 0 {
        return Err(DataError::TruncatedRecord {
            records: bytes.len() / RECORD_LEN,
            trailing,
        });
    }

    bytes
        .par_chunks_exact(RECORD_LEN)
        .with_min_len(MIN_RECORDS_PER_JOB)
        .map(decode_record)
        .collect()
}

/// Encodes points as consecutive records.
#[must_use]
pub fn encode_binary(points: &[Point]) -> Vec<u8> {
    let mut out = Vec::with_capacity(points.len() * RECORD_LEN);
    for point in points {
        out.extend_from_slice(&point.timestamp.to_le_bytes());
        out.extend_from_slice(&point.rate.to_le_bytes());
    }
    out
}

fn decode_record(record: &[u8]) -> Result<Point, DataError> {
    let (ts, rate) = record.split_at(8);
    let ts: [u8; 8] = ts
        .try_into()
        .map_err(|_| DataError::CorruptData(format!("bad timestamp field: {ts:?}")))?;
    let rate: [u8; 8] = rate
        .try_into()
        .map_err(|_| DataError::CorruptData(format!("bad rate field: {rate:?}")))?;
    Ok(Point::new(f64::from_le_bytes(rate), u64::from_le_bytes(ts)))
}
