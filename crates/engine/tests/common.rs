use ratewin_types::{Point, Series, Stats};

pub const FLOAT_EPS: f64 = 1e-7;

/// The three-point fixture: rates 3, 1, 2 at t = 30, 20, 10.
pub fn three_points() -> Series {
    vec![
        Point::new(3.0, 30),
        Point::new(1.0, 20),
        Point::new(2.0, 10),
    ]
    .into()
}

/// Deterministic dense series, newest first.
pub fn dense_series(len: usize, newest_ts: u64, interval_ms: u64) -> Series {
    (0..len)
        .map(|i| {
            let wave = ((i as f64) / 37.0).sin() * 0.4;
            let drift = (i as f64) * 0.00001;
            Point::new(74.0 + wave + drift, newest_ts - i as u64 * interval_ms)
        })
        .collect::<Vec<_>>()
        .into()
}

pub fn assert_stats_close(actual: &Stats, expected: &Stats) {
    assert!(
        actual.approx_eq(expected, FLOAT_EPS),
        "stats differ:\n  actual:   {actual:?}\n  expected: {expected:?}"
    );
}
