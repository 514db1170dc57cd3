use std::path::Path;

use ratewin_data::encode_binary;
use ratewin_types::Point;

pub const FLOAT_EPS: f64 = 1e-9;

/// Three points in file order (oldest first, as they usually arrive).
pub fn sample_points() -> Vec<Point> {
    vec![
        Point::new(2.0, 1_616_761_300_980),
        Point::new(1.0, 1_616_761_300_990),
        Point::new(3.0, 1_616_761_301_000),
    ]
}

pub fn write_json(path: &Path, points: &[Point]) {
    std::fs::write(path, serde_json::to_vec(points).unwrap()).unwrap();
}

pub fn write_bin(path: &Path, points: &[Point]) {
    std::fs::write(path, encode_binary(points)).unwrap();
}
