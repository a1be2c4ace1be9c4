//! Shared fixtures for steady-window integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use steady_core::chrono::{NaiveDate, NaiveDateTime};
use steady_core::TimeSeries;
use steady_window::{ScanParameters, StabilityRule};

pub const MEAN_TOLERANCE: f64 = 1e-2;

pub fn ts(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Three steady episodes at 10:00 on 2024-11-12/13/14, one reading either
/// side of each at 30 s, separated by isolated transient readings.
pub fn reference_rows() -> Vec<(NaiveDateTime, [f64; 3])> {
    vec![
        (ts(12, 8, 0, 0), [80.0, 70.0, 40.0]),
        (ts(12, 8, 0, 20), [85.0, 75.0, 42.0]),
        (ts(12, 9, 59, 30), [99.5, 99.0, 49.8]),
        (ts(12, 10, 0, 0), [100.0, 100.0, 50.0]),
        (ts(12, 10, 0, 30), [100.5, 99.5, 50.2]),
        (ts(12, 14, 20, 3), [130.0, 90.0, 70.0]),
        (ts(13, 9, 59, 30), [109.6, 99.0, 59.8]),
        (ts(13, 10, 0, 0), [110.0, 100.0, 60.0]),
        (ts(13, 10, 0, 30), [110.4, 99.5, 60.2]),
        (ts(14, 9, 59, 30), [104.5, 99.0, 55.1]),
        (ts(14, 10, 0, 0), [105.0, 100.0, 55.0]),
        (ts(14, 10, 0, 30), [105.5, 99.5, 54.9]),
        (ts(14, 16, 0, 33), [120.0, 80.0, 65.0]),
    ]
}

pub fn series_from_rows(rows: &[(NaiveDateTime, [f64; 3])]) -> TimeSeries {
    let times = rows.iter().map(|(t, _)| *t).collect();
    let mut series = TimeSeries::new("time", times).unwrap();
    for (i, name) in ["col1", "col2", "col3"].iter().enumerate() {
        series
            .push_column(*name, rows.iter().map(|(_, v)| v[i]).collect())
            .unwrap();
    }
    series
}

pub fn reference_series() -> TimeSeries {
    series_from_rows(&reference_rows())
}

pub fn reference_params() -> ScanParameters {
    ScanParameters::new(
        "time",
        ["col1", "col2", "col3"],
        vec![StabilityRule::new("col1", 1.0), StabilityRule::new("col3", 0.5)],
        1,
    )
}
