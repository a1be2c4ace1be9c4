//! Result tables and CSV output

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use steady_core::{format_timestamp, TimeSeries};
use steady_window::{ScanOutcome, ScanParameters};
use tracing::info;

use crate::Result;

/// Column holding the point timestamps in [`points_frame`]
pub const POINTS_COLUMN: &str = "operational_points";

/// One-column frame of point timestamps, formatted `YYYY-MM-DD HH:MM:SS`
pub fn points_frame(outcome: &ScanOutcome) -> Result<DataFrame> {
    let stamps: Vec<String> = outcome
        .points
        .iter()
        .map(|p| format_timestamp(&p.timestamp))
        .collect();

    Ok(DataFrame::new(vec![Column::new(POINTS_COLUMN.into(), stamps)])?)
}

/// Window means, one row per point.
///
/// The time column comes first, followed by the aggregated columns in
/// configuration order.
pub fn mean_records_frame(outcome: &ScanOutcome, params: &ScanParameters) -> Result<DataFrame> {
    let stamps: Vec<String> = outcome
        .records
        .iter()
        .map(|r| format_timestamp(&r.timestamp))
        .collect();

    let mut columns = vec![Column::new(params.time_column.as_str().into(), stamps)];
    let mut seen: Vec<&str> = Vec::new();
    for name in params.aggregated_columns() {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let values: Vec<f64> = outcome
            .records
            .iter()
            .map(|r| r.get(name).unwrap_or(f64::NAN))
            .collect();
        columns.push(Column::new(name.into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

/// Frame view of a series: formatted time column, then the value columns
pub fn series_frame(series: &TimeSeries) -> Result<DataFrame> {
    let stamps: Vec<String> = series.times().iter().map(format_timestamp).collect();

    let mut columns = vec![Column::new(series.time_column().into(), stamps)];
    for (idx, name) in series.column_names().iter().enumerate() {
        columns.push(Column::new(name.as_str().into(), series.column_at(idx).to_vec()));
    }

    Ok(DataFrame::new(columns)?)
}

/// Write `df` as CSV with a header row, replacing any existing file
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    info!(path = %path.display(), rows = df.height(), "File saved");
    Ok(())
}
