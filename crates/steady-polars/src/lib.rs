//! Polars integration for steady-state operational point detection
//!
//! This crate reads sensor tables (CSV or XLSX) into Polars, applies the configured row
//! filters and hands the result to the window engine. Results come back as
//! DataFrames ready to be written as CSV.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use steady_polars::{OperationalPointsExt, ScanParameters, StabilityRule};
//!
//! let df = df![
//!     "time" => ["2024-11-12 09:59:30", "2024-11-12 10:00:00", "2024-11-12 10:00:30"],
//!     "col1" => [99.5, 100.0, 100.5],
//! ]?;
//!
//! let params = ScanParameters::new("time", ["col1"], vec![StabilityRule::new("col1", 1.0)], 1);
//! let (points, means) = df.operational_points(&params)?;
//! assert_eq!(points.height(), 1);
//! ```

mod config;
mod error;
mod export;
mod filter;
mod ingest;
mod traits;

pub use self::config::*;
pub use error::{Error, Result};
pub use export::*;
pub use filter::FilterSpec;
pub use ingest::*;
pub use traits::*;

// Re-export commonly used types from the engine
pub use steady_core::TimeSeries;
pub use steady_window::{ScanOutcome, ScanParameters, StabilityRule};
