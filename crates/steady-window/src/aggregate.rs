//! Window-mean aggregation

use std::ops::Range;

use chrono::NaiveDateTime;
use steady_core::{Error, Result, TimeSeries};

use crate::traits::WindowAggregator;
use crate::types::MeanRecord;
use crate::window_index::WindowIndex;

/// Arithmetic mean of the non-NaN values in `values`.
///
/// Missing readings are stored as NaN and skipped. Returns NaN when nothing
/// contributes, never zero.
pub fn window_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Mean aggregator with target columns resolved against one series
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMean {
    columns: Vec<(String, usize)>,
}

impl WindowMean {
    /// Resolve `target_columns`, skipping the time column.
    ///
    /// A target absent from `series` is a configuration error.
    pub fn resolve<S: AsRef<str>>(
        series: &TimeSeries,
        target_columns: &[S],
        time_column: &str,
    ) -> Result<Self> {
        let mut columns: Vec<(String, usize)> = Vec::with_capacity(target_columns.len());
        for name in target_columns.iter().map(AsRef::as_ref) {
            if name == time_column || columns.iter().any(|(n, _)| n == name) {
                continue;
            }
            let idx = series
                .column_index(name)
                .ok_or_else(|| Error::missing_column(name, "mean_value_columns"))?;
            columns.push((name.to_string(), idx));
        }
        Ok(Self { columns })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Aggregate rows `window`, stamping the record with `timestamp`
    pub fn aggregate_range(
        &self,
        series: &TimeSeries,
        window: Range<usize>,
        timestamp: NaiveDateTime,
    ) -> MeanRecord {
        let means = self
            .columns
            .iter()
            .map(|(name, idx)| {
                let values = &series.column_at(*idx)[window.clone()];
                (name.clone(), window_mean(values))
            })
            .collect();

        MeanRecord { timestamp, means }
    }
}

impl WindowAggregator for WindowMean {
    fn aggregate_window(&self, series: &TimeSeries, window: Range<usize>, center: usize) -> MeanRecord {
        self.aggregate_range(series, window, series.time(center))
    }
}

/// Means of `target_columns` over rows with time in
/// `[window_start, window_end]`.
///
/// The record's timestamp is the midpoint of the window, which is the
/// candidate time when the window is built symmetrically around it.
pub fn aggregate<S: AsRef<str>>(
    series: &TimeSeries,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    target_columns: &[S],
    time_column: &str,
) -> Result<MeanRecord> {
    let aggregator = WindowMean::resolve(series, target_columns, time_column)?;
    let index = WindowIndex::new(series, chrono::Duration::zero());
    let rows = index.inclusive_range(window_start, window_end);
    let center = window_start + (window_end - window_start) / 2;

    Ok(aggregator.aggregate_range(series, rows, center))
}
