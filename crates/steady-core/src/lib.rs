//! Core types for steady-state operational point detection
//!
//! This crate holds what every other crate in the workspace agrees on: the
//! column-major [`TimeSeries`] the engine scans, timestamp helpers, and the
//! shared [`Error`] type.
//!
//! # Example
//!
//! ```rust
//! use steady_core::chrono::NaiveDate;
//! use steady_core::TimeSeries;
//!
//! let t0 = NaiveDate::from_ymd_opt(2024, 11, 12).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let t1 = NaiveDate::from_ymd_opt(2024, 11, 12).unwrap().and_hms_opt(10, 0, 30).unwrap();
//!
//! let series = TimeSeries::new("time", vec![t0, t1])?
//!     .with_column("flow", vec![12.5, 12.6])?;
//! assert_eq!(series.column("flow"), Some(&[12.5, 12.6][..]));
//! # Ok::<(), steady_core::Error>(())
//! ```

pub mod error;
pub mod series;
pub mod timestamp;

// Re-export core types
pub use error::{Error, Result};
pub use series::TimeSeries;
pub use timestamp::{format_timestamp, half_window, parse_strict, parse_timestamp, TIMESTAMP_FORMAT};

// Re-export chrono so downstream crates agree on the timestamp type
pub use chrono;
