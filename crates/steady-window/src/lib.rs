//! # Steady-State Window Detection
//!
//! This crate finds the moments at which a process runs in a steady regime
//! ("operational points") in a time-ordered table of sensor readings, and
//! reports the mean of selected columns around each of them.
//!
//! ## How a point is found
//!
//! - **Window Index**: binary search on the time column places the
//!   before-window `[T - half, T)` and after-window `(T, T + half]` of a
//!   candidate row as index ranges.
//! - **Stability Evaluator**: every value of every ruled column on both sides
//!   must stay within the rule's tolerance of the candidate's value.
//! - **Aggregator**: the mean of each requested column over `[T - half, T + half]`.
//! - **Scan Controller**: walks candidates in time order, moving one row
//!   forward on rejection and a half-window forward after a point.
//!
//! ## Example
//!
//! ```rust
//! use steady_core::chrono::{Duration, NaiveDate};
//! use steady_core::TimeSeries;
//! use steady_window::{scan, ScanParameters, StabilityRule};
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 11, 12).unwrap().and_hms_opt(9, 59, 30).unwrap();
//! let times = (0..3).map(|i| t0 + Duration::seconds(30 * i)).collect();
//! let series = TimeSeries::new("time", times)?
//!     .with_column("col1", vec![99.5, 100.0, 100.5])?;
//!
//! let params = ScanParameters::new("time", ["col1"], vec![StabilityRule::new("col1", 1.0)], 1);
//! let outcome = scan(&series, &params)?;
//!
//! assert_eq!(outcome.len(), 1);
//! assert_eq!(outcome.records[0].get("col1"), Some(100.0));
//! # Ok::<(), steady_core::Error>(())
//! ```

pub mod aggregate;
pub mod scan;
pub mod stability;
pub mod traits;
pub mod types;
pub mod window_index;

// Re-exports
pub use aggregate::{aggregate, window_mean, WindowMean};
pub use scan::{scan, scan_batch, ScanController, ScanState};
pub use stability::ToleranceEvaluator;
pub use traits::{StabilityEvaluator, WindowAggregator};
pub use types::{
    CandidateVerdict, MeanRecord, OperationalPoint, RejectReason, ScanOutcome, ScanParameters,
    ScanStatistics, StabilityRule,
};
pub use window_index::{first_at_or_after, start_candidate, WindowIndex};
