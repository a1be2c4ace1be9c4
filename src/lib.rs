//! # Steady Points
//!
//! Detection of steady-state operational points in process sensor data.
//!
//! ## Crates
//!
//! - `steady-core`: time series container, timestamps and errors
//! - `steady-window`: window index, stability rules, aggregation and the scan
//! - `steady-polars`: CSV and XLSX ingestion, configuration, filtering and export
//!
//! The [`pipeline`] module ties them together into a file-to-file run.

pub mod pipeline;

// Re-export workspace crates
pub use steady_core;
pub use steady_polars;
pub use steady_window;

pub use pipeline::{analyse_operational_points, analyse_with_config_file, AnalysisReport};
pub use steady_core::TimeSeries;
pub use steady_polars::{AnalysisConfig, OperationalPointsExt, ValidatedConfig};
pub use steady_window::{scan, ScanOutcome, ScanParameters, StabilityRule};
