//! Common types used in steady-state window detection

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use steady_core::{half_window, Error, Result, TimeSeries};

/// A per-column stability tolerance
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityRule {
    /// Column the tolerance applies to (lowercase)
    pub column: String,

    /// Maximum allowed absolute deviation from the center value
    pub tolerance: f64,
}

impl StabilityRule {
    pub fn new(column: impl Into<String>, tolerance: f64) -> Self {
        Self {
            column: column.into().to_lowercase(),
            tolerance,
        }
    }
}

/// Parameters for one scan pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParameters {
    /// Name of the time column of the series
    pub time_column: String,

    /// Columns averaged over the aggregation window of each point
    pub mean_value_columns: Vec<String>,

    /// Stability tolerances, all of which must hold
    pub margins: Vec<StabilityRule>,

    /// Total window length in minutes; half of it is looked at on each side
    pub time_window_minutes: u32,
}

impl ScanParameters {
    pub fn new<S: Into<String>>(
        time_column: impl Into<String>,
        mean_value_columns: impl IntoIterator<Item = S>,
        margins: Vec<StabilityRule>,
        time_window_minutes: u32,
    ) -> Self {
        Self {
            time_column: time_column.into().to_lowercase(),
            mean_value_columns: mean_value_columns
                .into_iter()
                .map(|c| c.into().to_lowercase())
                .collect(),
            margins,
            time_window_minutes,
        }
    }

    /// Distance looked at before and after each candidate
    pub fn half_window(&self) -> Duration {
        half_window(self.time_window_minutes)
    }

    /// Mean value columns without the time column, in configured order
    pub fn aggregated_columns(&self) -> impl Iterator<Item = &str> {
        self.mean_value_columns
            .iter()
            .map(String::as_str)
            .filter(move |c| *c != self.time_column)
    }

    /// Check the parameter bundle against a series.
    ///
    /// Parameter-level problems (empty lists, bad tolerances, empty time
    /// column) are always reported. Column presence is only checked when the
    /// series has rows; scanning an empty series is not an error.
    pub fn validate(&self, series: &TimeSeries) -> Result<()> {
        if self.time_column.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "time_column must be a non-empty string".to_string(),
            ));
        }
        if self.aggregated_columns().next().is_none() {
            return Err(Error::EmptyParameter("mean_value_columns".to_string()));
        }
        if self.margins.is_empty() {
            return Err(Error::EmptyParameter("margins".to_string()));
        }
        if let Some(rule) = self
            .margins
            .iter()
            .find(|r| !(r.tolerance.is_finite() && r.tolerance > 0.0))
        {
            return Err(Error::InvalidTolerance {
                column: rule.column.clone(),
                tolerance: rule.tolerance,
            });
        }

        if series.is_empty() {
            return Ok(());
        }

        if self.time_column != series.time_column() {
            return Err(Error::missing_column(&self.time_column, "time_column"));
        }
        if let Some(rule) = self.margins.iter().find(|r| series.column(&r.column).is_none()) {
            return Err(Error::missing_column(&rule.column, "margins"));
        }
        if let Some(col) = self.aggregated_columns().find(|c| series.column(c).is_none()) {
            return Err(Error::missing_column(col, "mean_value_columns"));
        }
        Ok(())
    }
}

/// A timestamp at which every stability rule held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationalPoint {
    /// Timestamp of the center row
    pub timestamp: NaiveDateTime,

    /// Row index of the center row in the scanned series
    pub row: usize,
}

/// Window means for one operational point
#[derive(Debug, Clone, PartialEq)]
pub struct MeanRecord {
    /// Value of the time column; the candidate's timestamp
    pub timestamp: NaiveDateTime,

    /// `(column, mean)` pairs in the order the columns were requested
    pub means: Vec<(String, f64)>,
}

impl MeanRecord {
    /// Mean of a column, `None` if it was not aggregated
    pub fn get(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| *v)
    }
}

/// Why a candidate was not reported
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// No rows in `[T - half, T)`
    EmptyBeforeWindow,

    /// No rows in `(T, T + half]`
    EmptyAfterWindow,

    /// A value deviated from the center by more than the tolerance
    ToleranceExceeded {
        column: String,
        deviation: f64,
        tolerance: f64,
    },
}

/// Outcome of evaluating one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateVerdict {
    /// All rules held on both sides of the candidate
    Stable,

    /// Candidate is skipped
    Rejected(RejectReason),
}

impl CandidateVerdict {
    pub fn is_stable(&self) -> bool {
        matches!(self, CandidateVerdict::Stable)
    }
}

impl fmt::Display for CandidateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateVerdict::Stable => write!(f, "Stable"),
            CandidateVerdict::Rejected(RejectReason::EmptyBeforeWindow) => {
                write!(f, "Rejected: empty before-window")
            }
            CandidateVerdict::Rejected(RejectReason::EmptyAfterWindow) => {
                write!(f, "Rejected: empty after-window")
            }
            CandidateVerdict::Rejected(RejectReason::ToleranceExceeded {
                column,
                deviation,
                tolerance,
            }) => write!(
                f,
                "Rejected: '{}' deviates by {:.4} (tolerance {})",
                column, deviation, tolerance
            ),
        }
    }
}

/// Counters collected during a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Candidates taken as window center
    pub candidates: usize,

    /// Candidates skipped because a side window was empty
    pub empty_window_rejections: usize,

    /// Candidates skipped because a tolerance was exceeded
    pub tolerance_rejections: usize,

    /// Operational points recorded
    pub points: usize,
}

impl ScanStatistics {
    pub(crate) fn record(&mut self, verdict: &CandidateVerdict) {
        self.candidates += 1;
        match verdict {
            CandidateVerdict::Stable => self.points += 1,
            CandidateVerdict::Rejected(RejectReason::ToleranceExceeded { .. }) => {
                self.tolerance_rejections += 1
            }
            CandidateVerdict::Rejected(_) => self.empty_window_rejections += 1,
        }
    }
}

/// Result of one scan pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Detected points in increasing time order
    pub points: Vec<OperationalPoint>,

    /// Mean records, parallel to `points`
    pub records: Vec<MeanRecord>,

    /// Counters for the pass
    pub statistics: ScanStatistics,
}

impl ScanOutcome {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Points paired with their mean records
    pub fn iter(&self) -> impl Iterator<Item = (&OperationalPoint, &MeanRecord)> {
        self.points.iter().zip(self.records.iter())
    }
}
