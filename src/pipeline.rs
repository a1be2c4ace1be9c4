//! File-to-file analysis: read, filter, scan, write

use std::fs;
use std::path::{Path, PathBuf};

use steady_polars::{
    frame_to_series, mean_records_frame, points_frame, read_table, series_frame, write_csv,
    AnalysisConfig, Result, ValidatedConfig,
};
use steady_window::{scan, ScanOutcome};
use tracing::{info, warn};

/// Filtered input, time column first
pub const FILTERED_FILE: &str = "input_file_filtered.csv";

/// Point timestamps, one per row
pub const POINTS_FILE: &str = "only_operational_points.csv";

/// Window means per point
pub const MEANS_FILE: &str = "op_with_mean_values.csv";

/// Log file written next to the results by the command-line tool
pub const LOG_FILE: &str = "logging_output.txt";

/// What one analysis run read and wrote
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub input_rows: usize,
    pub filtered_rows: usize,
    pub outcome: ScanOutcome,
    pub filtered_path: PathBuf,
    pub points_path: PathBuf,
    pub means_path: PathBuf,
}

impl AnalysisReport {
    pub fn point_count(&self) -> usize {
        self.outcome.len()
    }
}

/// Run the whole analysis for `input`, writing the three result files into
/// `output_dir` (created if needed).
///
/// Finding no point is not an error; the result files are then written
/// with headers only.
pub fn analyse_operational_points(
    config: &ValidatedConfig,
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<AnalysisReport> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let df = read_table(input)?;
    let series = frame_to_series(&df, config.time_column(), config.needed_columns())?;
    let filtered = config.filter.apply(&series)?;

    let filtered_path = output_dir.join(FILTERED_FILE);
    write_csv(&mut series_frame(&filtered)?, &filtered_path)?;

    let outcome = scan(&filtered, &config.scan)?;
    if outcome.is_empty() {
        warn!("No operational points found");
    }

    let points_path = output_dir.join(POINTS_FILE);
    write_csv(&mut points_frame(&outcome)?, &points_path)?;

    let means_path = output_dir.join(MEANS_FILE);
    write_csv(&mut mean_records_frame(&outcome, &config.scan)?, &means_path)?;

    info!(points = outcome.len(), "Analysis of operational points completed");

    Ok(AnalysisReport {
        input_rows: df.height(),
        filtered_rows: filtered.len(),
        outcome,
        filtered_path,
        points_path,
        means_path,
    })
}

/// Load and validate the rule file at `config_path`, then analyse `input`
pub fn analyse_with_config_file(
    config_path: impl AsRef<Path>,
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<AnalysisReport> {
    let config = AnalysisConfig::load_validated(config_path)?;
    analyse_operational_points(&config, input, output_dir)
}
