#![allow(dead_code)]

use std::io::Write;

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use flate2::{write::GzEncoder, Compression};
use nalgebra::Point2;
use starmap::constants::EpochYear;
use starmap::conversion::SkyPosition;

pub fn data_path(file: &str) -> Utf8PathBuf {
    Utf8PathBuf::from("tests/data").join(file)
}

pub fn read_data(file: &str) -> Vec<u8> {
    std::fs::read(data_path(file)).unwrap()
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Flat projection centered on Lyra, 100° per chart unit.
pub fn lyra_projector(position: &SkyPosition, _epoch: EpochYear) -> Point2<f64> {
    Point2::new(
        (position.ra_degrees() - 281.0) / 100.0,
        (position.dec_degrees() - 36.0) / 100.0,
    )
}

pub fn assert_point_close(actual: Point2<f64>, expected: Point2<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
}
