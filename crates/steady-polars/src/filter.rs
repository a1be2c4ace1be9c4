//! Row removal, projection and equality filtering

use chrono::NaiveDateTime;
use steady_core::{format_timestamp, TimeSeries};
use tracing::{info, warn};

use crate::{Error, Result};

/// What to keep of the input before scanning
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub time_column: String,

    /// Value columns kept next to the time column
    pub columns: Vec<String>,

    /// `(column, value)` pairs a row must match exactly
    pub conditions: Vec<(String, i64)>,

    /// Drop every row stamped with exactly this time
    pub row_to_remove: Option<NaiveDateTime>,
}

impl FilterSpec {
    /// Apply removal, projection and conditions, in that order.
    ///
    /// A result without rows is an error: nothing downstream can use it.
    pub fn apply(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let mut current = series.clone();

        if let Some(target) = self.row_to_remove {
            let before = current.len();
            current = current.retain_rows(|row| series.time(row) != target);
            let removed = before - current.len();
            if removed == 0 {
                warn!(time = %format_timestamp(&target), "row_to_remove matched no row");
            } else {
                info!(time = %format_timestamp(&target), removed, "Row removed");
            }
        }

        current = current.select(&self.columns[..])?;

        for (column, expected) in &self.conditions {
            let values = current
                .column(column)
                .ok_or_else(|| steady_core::Error::missing_column(column, "conditions"))?
                .to_vec();
            let target = *expected as f64;
            let before = current.len();
            current = current.retain_rows(|row| values[row] == target);
            info!(
                column = %column,
                value = expected,
                dropped = before - current.len(),
                rows = current.len(),
                "Data filtered according to the condition"
            );
        }

        if current.is_empty() {
            return Err(Error::EmptyData(
                "no rows remain after filtering".to_string(),
            ));
        }
        Ok(current)
    }
}
