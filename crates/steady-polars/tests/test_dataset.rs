//! Reading, filtering and scanning the reference dataset

mod common;

use approx::assert_relative_eq;
use common::*;
use polars::prelude::*;
use steady_polars::{
    frame_to_series, mean_records_frame, points_frame, read_table, write_csv, AnalysisConfig,
    Error, OperationalPointsExt, POINTS_COLUMN,
};

fn assert_means(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = MEAN_TOLERANCE);
    }
}

#[test]
fn test_read_table_lowercases_headers() {
    let df = read_table(data_path("op_dataset.csv")).unwrap();
    assert_eq!(column_names(&df), vec!["time", "col1", "col2", "col3", "col9"]);
    assert_eq!(df.height(), 14);
}

#[test]
fn test_time_sorting() {
    let df = read_table(data_path("op_dataset.csv")).unwrap();
    let series = frame_to_series(&df, "time", &["col1"]).unwrap();

    assert!(series.times().windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(series.column("col1").unwrap()[0], 80.0);
}

#[test]
fn test_configured_filtering() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = read_table(data_path("op_dataset.csv")).unwrap();
    let series = frame_to_series(&df, validated.time_column(), validated.needed_columns()).unwrap();

    let filtered = validated.filter.apply(&series).unwrap();

    // the col9 == 4 row and the removed row are gone
    assert_eq!(filtered.len(), 12);
    assert!(filtered.column("col9").unwrap().iter().all(|v| *v == 5.0));
    assert!(!filtered.times().contains(&validated.filter.row_to_remove.unwrap()));
}

#[test]
fn test_operational_points_on_frame() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = read_table(data_path("op_dataset.csv")).unwrap();

    let (points, means) = df.operational_points(&validated.scan).unwrap();

    assert_eq!(
        str_values(&points, POINTS_COLUMN),
        vec!["2024-11-12 10:00:00", "2024-11-13 10:00:00", "2024-11-14 10:00:00"]
    );
    assert_eq!(column_names(&means), vec!["time", "col1", "col2", "col3"]);
    assert_eq!(str_values(&means, "time"), str_values(&points, POINTS_COLUMN));
    assert_means(&f64_values(&means, "col1"), &[100.0, 110.0, 105.0]);
    assert_means(&f64_values(&means, "col2"), &[99.5, 99.5, 99.5]);
    assert_means(&f64_values(&means, "col3"), &[50.0, 60.0, 55.0]);
}

#[test]
fn test_perturbed_frame_drops_point() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = df![
        "time" => ["2024-11-13 09:59:30", "2024-11-13 10:00:00", "2024-11-13 10:00:30"],
        "col1" => [109.6, 112.0, 110.4],
        "col2" => [99.0, 100.0, 99.5],
        "col3" => [59.8, 60.0, 60.2],
    ]
    .unwrap();

    let (points, means) = df.operational_points(&validated.scan).unwrap();
    assert_eq!(points.height(), 0);
    assert_eq!(means.height(), 0);
}

#[test]
fn test_missing_margin_column_in_frame() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = df!["time" => ["2024-11-13 10:00:00"], "col1" => [1.0], "col2" => [1.0]].unwrap();

    let err = df.operational_points(&validated.scan).unwrap_err();
    match err {
        Error::SteadyCore(ref core) => {
            assert!(core.is_configuration());
            assert!(matches!(
                core,
                steady_core::Error::MissingColumn { column, context }
                    if column == "col3" && context == "margins"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_mean_column_in_frame() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = df!["time" => ["2024-11-13 10:00:00"], "col1" => [1.0], "col3" => [1.0]].unwrap();

    let err = df.operational_points(&validated.scan).unwrap_err();
    assert!(matches!(
        err,
        Error::SteadyCore(steady_core::Error::MissingColumn { ref column, ref context })
            if column == "col2" && context == "mean_value_columns"
    ));
}

#[test]
fn test_written_results_read_back() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = read_table(data_path("op_dataset.csv")).unwrap();
    let outcome = df.scan_outcome(&validated.scan).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let points_path = dir.path().join("only_operational_points.csv");
    let means_path = dir.path().join("op_with_mean_values.csv");
    write_csv(&mut points_frame(&outcome).unwrap(), &points_path).unwrap();
    write_csv(
        &mut mean_records_frame(&outcome, &validated.scan).unwrap(),
        &means_path,
    )
    .unwrap();

    let points = read_table(&points_path).unwrap();
    assert_eq!(points.height(), 3);
    assert_eq!(column_names(&points), vec![POINTS_COLUMN]);

    let means = read_table(&means_path).unwrap();
    assert_eq!(column_names(&means), vec!["time", "col1", "col2", "col3"]);
    assert_means(&f64_values(&means, "col3"), &[50.0, 60.0, 55.0]);
}

#[test]
fn test_spreadsheet_matches_csv() {
    let validated = AnalysisConfig::load_validated(data_path("rules.yaml")).unwrap();
    let df = read_table(data_path("op_dataset.xlsx")).unwrap();
    assert_eq!(column_names(&df), vec!["time", "col1", "col2", "col3", "col9"]);
    assert_eq!(df.height(), 14);

    let series = frame_to_series(&df, validated.time_column(), validated.needed_columns()).unwrap();
    assert_eq!(validated.filter.apply(&series).unwrap().len(), 12);

    let (points, means) = df.operational_points(&validated.scan).unwrap();
    assert_eq!(
        str_values(&points, POINTS_COLUMN),
        vec!["2024-11-12 10:00:00", "2024-11-13 10:00:00", "2024-11-14 10:00:00"]
    );
    assert_means(&f64_values(&means, "col1"), &[100.0, 110.0, 105.0]);
    assert_means(&f64_values(&means, "col3"), &[50.0, 60.0, 55.0]);
}

#[test]
fn test_unsupported_input_format() {
    let err = read_table(data_path("op_dataset.json")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn test_missing_config_file() {
    let err = AnalysisConfig::load(data_path("no_such_rules.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
