//! Common test utilities for steady-polars tests

#![allow(dead_code)]

use std::path::PathBuf;

use polars::prelude::*;

pub const MEAN_TOLERANCE: f64 = 1e-2;

/// Path of a file under `tests/data`
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Extract a string column as owned values
pub fn str_values(df: &DataFrame, col_name: &str) -> Vec<String> {
    df.column(col_name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap().to_string())
        .collect()
}

/// Extract a float column, nulls as NaN
pub fn f64_values(df: &DataFrame, col_name: &str) -> Vec<f64> {
    df.column(col_name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}
