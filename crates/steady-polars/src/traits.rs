//! DataFrame extension trait for operational point detection

use polars::prelude::*;
use steady_core::TimeSeries;
use steady_window::{scan, ScanOutcome, ScanParameters};

use crate::export::{mean_records_frame, points_frame};
use crate::ingest::{frame_to_series, missing_columns};
use crate::Result;

/// Extension trait running the steady-state scan on a Polars DataFrame
pub trait OperationalPointsExt {
    /// Convert the frame into a time series carrying the columns `params` uses
    fn steady_series(&self, params: &ScanParameters) -> Result<TimeSeries>;

    /// Scan the frame and keep the typed outcome
    fn scan_outcome(&self, params: &ScanParameters) -> Result<ScanOutcome>;

    /// Find the operational points of the frame
    ///
    /// # Arguments
    /// * `params` - Time column, window length, margins and mean columns
    ///
    /// # Returns
    /// The point timestamps (column `operational_points`) and the window
    /// means (time column first, then the mean columns)
    fn operational_points(&self, params: &ScanParameters) -> Result<(DataFrame, DataFrame)>;
}

impl OperationalPointsExt for DataFrame {
    fn steady_series(&self, params: &ScanParameters) -> Result<TimeSeries> {
        let margin_columns: Vec<&str> = params.margins.iter().map(|r| r.column.as_str()).collect();
        let mean_columns: Vec<&str> = params.aggregated_columns().collect();
        let checks = [
            ("time_column", vec![params.time_column.as_str()]),
            ("margins", margin_columns),
            ("mean_value_columns", mean_columns),
        ];
        for (context, names) in &checks {
            if let Some(column) = missing_columns(self, &names[..]).first() {
                return Err(steady_core::Error::missing_column(column, context).into());
            }
        }

        let mut columns: Vec<&str> = Vec::new();
        let used = params
            .margins
            .iter()
            .map(|r| r.column.as_str())
            .chain(params.aggregated_columns());
        for name in used {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
        frame_to_series(self, &params.time_column, &columns)
    }

    fn scan_outcome(&self, params: &ScanParameters) -> Result<ScanOutcome> {
        let series = self.steady_series(params)?;
        Ok(scan(&series, params)?)
    }

    fn operational_points(&self, params: &ScanParameters) -> Result<(DataFrame, DataFrame)> {
        let outcome = self.scan_outcome(params)?;
        Ok((points_frame(&outcome)?, mean_records_frame(&outcome, params)?))
    }
}
