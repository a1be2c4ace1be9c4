//! Column-major time series shared by every stage of the pipeline
//!
//! A [`TimeSeries`] holds one timestamp per row plus any number of named
//! `f64` columns of the same length. Rows are kept non-decreasing by time so
//! that window boundaries can be located by binary search. Missing numeric
//! cells are stored as `NaN`.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;

/// Ordered, immutable-by-convention table of sensor readings
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    time_column: String,
    times: Vec<NaiveDateTime>,
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Create a series from timestamps that are already sorted.
    ///
    /// Fails with [`Error::InvalidInput`] if the timestamps decrease anywhere.
    pub fn new(time_column: impl Into<String>, times: Vec<NaiveDateTime>) -> Result<Self> {
        if let Some(pos) = times.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidInput(format!(
                "time column is not sorted: row {} ({}) precedes row {} ({})",
                pos,
                times[pos],
                pos + 1,
                times[pos + 1]
            )));
        }

        Ok(Self {
            time_column: time_column.into().to_lowercase(),
            times,
            names: Vec::new(),
            values: Vec::new(),
        })
    }

    /// A series with no rows and no value columns
    pub fn empty(time_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into().to_lowercase(),
            times: Vec::new(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a series from rows in arbitrary order.
    ///
    /// Rows are stably sorted by timestamp, so rows sharing a timestamp keep
    /// their input order.
    pub fn from_unsorted(
        time_column: impl Into<String>,
        times: Vec<NaiveDateTime>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut order: Vec<usize> = (0..times.len()).collect();
        order.sort_by_key(|&i| times[i]);

        let sorted_times = order.iter().map(|&i| times[i]).collect();
        let mut series = Self::new(time_column, sorted_times)?;
        for (name, values) in columns {
            if values.len() != times.len() {
                return Err(Error::size_mismatch(
                    times.len(),
                    values.len(),
                    &format!("column '{name}'"),
                ));
            }
            let permuted = order.iter().map(|&i| values[i]).collect();
            series.push_column(name, permuted)?;
        }
        Ok(series)
    }

    /// Append a numeric column, builder style
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Append a numeric column.
    ///
    /// Column names are lowercased; a name that collides with the time column
    /// or an existing column is rejected.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into().to_lowercase();
        if values.len() != self.times.len() {
            return Err(Error::size_mismatch(
                self.times.len(),
                values.len(),
                &format!("column '{name}'"),
            ));
        }
        if name == self.time_column || self.names.contains(&name) {
            return Err(Error::InvalidInput(format!("duplicate column '{name}'")));
        }

        self.names.push(name);
        self.values.push(values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn time(&self, row: usize) -> NaiveDateTime {
        self.times[row]
    }

    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.times.first().copied()
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// Names of the numeric columns, in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// True for the time column and for every numeric column
    pub fn has_column(&self, name: &str) -> bool {
        name == self.time_column || self.column_index(name).is_some()
    }

    /// Position of a numeric column, usable with [`TimeSeries::column_at`]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|idx| self.values[idx].as_slice())
    }

    pub fn column_at(&self, idx: usize) -> &[f64] {
        &self.values[idx]
    }

    /// Keep only the rows for which `keep(row)` is true
    pub fn retain_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&r| keep(r)).collect();

        Self {
            time_column: self.time_column.clone(),
            times: rows.iter().map(|&r| self.times[r]).collect(),
            names: self.names.clone(),
            values: self
                .values
                .iter()
                .map(|col| rows.iter().map(|&r| col[r]).collect())
                .collect(),
        }
    }

    /// Project onto the time column plus the named numeric columns.
    ///
    /// Every missing name is reported in a single error. Naming the time
    /// column is allowed and has no effect.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let missing: Vec<&str> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| !self.has_column(n))
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_column(&missing.join(", "), "the column selection"));
        }

        let mut projected = Self {
            time_column: self.time_column.clone(),
            times: self.times.clone(),
            names: Vec::new(),
            values: Vec::new(),
        };
        for name in names.iter().map(AsRef::as_ref) {
            if name == self.time_column || projected.names.iter().any(|n| n == name) {
                continue;
            }
            if let Some(idx) = self.column_index(name) {
                projected.names.push(name.to_string());
                projected.values.push(self.values[idx].clone());
            }
        }
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 12)
            .unwrap()
            .and_hms_opt(10, min, 0)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_unsorted() {
        let err = TimeSeries::new("time", vec![at(0), at(2), at(1)]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_ties_are_allowed() {
        let series = TimeSeries::new("time", vec![at(0), at(0), at(1)]).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_from_unsorted_is_stable() {
        let series = TimeSeries::from_unsorted(
            "Time",
            vec![at(2), at(0), at(2), at(1)],
            vec![("Col1".to_string(), vec![1.0, 2.0, 3.0, 4.0])],
        )
        .unwrap();

        assert_eq!(series.time_column(), "time");
        assert_eq!(series.times(), &[at(0), at(1), at(2), at(2)]);
        assert_eq!(series.column("col1").unwrap(), &[2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn test_push_column_validation() {
        let mut series = TimeSeries::new("time", vec![at(0), at(1)]).unwrap();
        assert!(series.push_column("a", vec![1.0]).is_err());
        series.push_column("A", vec![1.0, 2.0]).unwrap();
        assert!(series.push_column("a", vec![1.0, 2.0]).is_err());
        assert!(series.push_column("TIME", vec![1.0, 2.0]).is_err());
        assert_eq!(series.column_names(), &["a".to_string()]);
    }

    #[test]
    fn test_retain_rows() {
        let series = TimeSeries::new("time", vec![at(0), at(1), at(2)])
            .unwrap()
            .with_column("x", vec![1.0, 2.0, 3.0])
            .unwrap();

        let kept = series.retain_rows(|r| r != 1);
        assert_eq!(kept.times(), &[at(0), at(2)]);
        assert_eq!(kept.column("x").unwrap(), &[1.0, 3.0]);
    }

    #[test]
    fn test_select_reports_all_missing() {
        let series = TimeSeries::new("time", vec![at(0)])
            .unwrap()
            .with_column("a", vec![1.0])
            .unwrap()
            .with_column("b", vec![2.0])
            .unwrap();

        let projected = series.select(&["time", "b"]).unwrap();
        assert_eq!(projected.column_names(), &["b".to_string()]);

        let err = series.select(&["a", "zz", "yy"]).unwrap_err();
        assert!(err.to_string().contains("zz, yy"));
    }
}
