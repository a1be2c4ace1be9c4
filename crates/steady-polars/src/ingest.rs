//! Reading tables and turning them into time series

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use polars::prelude::*;
use steady_core::{format_timestamp, parse_timestamp, TimeSeries};
use tracing::{debug, info};

use crate::{Error, Result};

static EMPTY_CELL: Data = Data::Empty;

/// Read a CSV or spreadsheet table with a header row.
///
/// Column names are lowercased. The format follows the extension: `.csv`
/// is read as comma separated text, `.xlsx` and `.xls` through the first
/// worksheet. Anything else is refused before the file is opened, and a
/// table without rows is an error.
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let spreadsheet = match extension.as_deref() {
        Some("csv") => false,
        Some("xlsx") | Some("xls") => true,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };
    if !path.is_file() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("The specified file was not found: {}", path.display()),
        )));
    }

    let mut df = if spreadsheet {
        read_spreadsheet(path)?
    } else {
        read_csv(path)?
    };
    normalize_column_names(&mut df)?;

    if df.height() == 0 {
        return Err(Error::EmptyData(format!("{} has no rows", path.display())));
    }

    info!(path = %path.display(), rows = df.height(), columns = df.width(), "Data file loaded successfully");
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    // A full scan, so a fraction deep in an integer-looking column still
    // yields a float column
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?)
}

/// First worksheet as a frame. A column whose cells are all numbers or
/// blanks becomes `f64`; any other column becomes text, with date cells
/// written as `YYYY-MM-DD HH:MM:SS`.
fn read_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::EmptyData(format!("{} has no worksheet", path.display())))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| Error::EmptyData(format!("{} has no header row", path.display())))?;
    let names: Vec<String> = header.iter().map(|cell| cell.to_string().trim().to_string()).collect();
    if let Some(position) = names.iter().position(String::is_empty) {
        return Err(Error::InvalidColumn(format!(
            "header cell {} of {} is empty",
            position + 1,
            path.display()
        )));
    }
    let body: Vec<&[Data]> = rows.collect();

    let mut columns = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let cells = body.iter().map(|row| row.get(index).unwrap_or(&EMPTY_CELL));
        let numeric = cells
            .clone()
            .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_) | Data::Empty));
        let column = if numeric {
            let values: Vec<Option<f64>> = cells.map(|cell| cell.as_f64()).collect();
            Column::new(name.as_str().into(), values)
        } else {
            let values: Vec<Option<String>> = cells.map(cell_text).collect();
            Column::new(name.as_str().into(), values)
        };
        columns.push(column);
    }

    debug!(path = %path.display(), rows = body.len(), "worksheet read");
    Ok(DataFrame::new(columns)?)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| format_timestamp(&dt))
            .or_else(|| Some(cell.to_string())),
        other => Some(other.to_string()),
    }
}

/// Lowercase every column name in place
pub fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
    let original: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    let lowered: Vec<String> = original.iter().map(|n| n.to_lowercase()).collect();

    for (i, name) in lowered.iter().enumerate() {
        if lowered[..i].contains(name) {
            return Err(Error::InvalidColumn(format!(
                "column '{name}' appears more than once after lowercasing"
            )));
        }
    }

    for (old, new) in original.iter().zip(lowered) {
        if *old != new {
            df.rename(old, new.into())?;
        }
    }
    Ok(())
}

/// Names from `required` that `df` lacks, in the order given
pub fn missing_columns<S: AsRef<str>>(df: &DataFrame, required: &[S]) -> Vec<String> {
    let present: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !present.iter().any(|p| p == name))
        .map(str::to_string)
        .collect()
}

/// Convert a frame into a [`TimeSeries`] keyed on `time_column`.
///
/// Only the listed value columns are carried over; they must be numeric and
/// nulls become NaN. Rows are stably sorted by time.
pub fn frame_to_series<S: AsRef<str>>(
    df: &DataFrame,
    time_column: &str,
    value_columns: &[S],
) -> Result<TimeSeries> {
    let mut required: Vec<&str> = vec![time_column];
    required.extend(value_columns.iter().map(AsRef::as_ref));
    let missing = missing_columns(df, &required);
    if !missing.is_empty() {
        let column = missing.join(", ");
        return Err(steady_core::Error::missing_column(&column, "the input table").into());
    }

    let times = time_values(df.column(time_column)?)?;

    let mut columns: Vec<(String, Vec<f64>)> = Vec::with_capacity(value_columns.len());
    for name in value_columns.iter().map(AsRef::as_ref) {
        if name == time_column || columns.iter().any(|(n, _)| n == name) {
            continue;
        }
        columns.push((name.to_string(), numeric_values(df.column(name)?)?));
    }

    debug!(rows = times.len(), columns = columns.len(), "frame converted to time series");
    Ok(TimeSeries::from_unsorted(time_column, times, columns)?)
}

fn time_values(column: &Column) -> Result<Vec<chrono::NaiveDateTime>> {
    let name = column.name().to_string();
    match column.dtype() {
        DataType::String => {}
        dt => {
            return Err(Error::TypeMismatch {
                column: name,
                expected: "timestamp text".to_string(),
                got: format!("{dt:?}"),
            })
        }
    }

    column
        .str()?
        .into_iter()
        .map(|raw| {
            let raw = raw.unwrap_or("");
            parse_timestamp(raw).ok_or_else(|| Error::InvalidTimestamp {
                column: name.clone(),
                value: raw.to_string(),
            })
        })
        .collect()
}

fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let float_column = match column.dtype() {
        DataType::Float64 => column.clone(),
        DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => {
            column.cast(&DataType::Float64)?
        }
        dt => {
            return Err(Error::TypeMismatch {
                column: column.name().to_string(),
                expected: "numeric".to_string(),
                got: format!("{dt:?}"),
            })
        }
    };

    Ok(float_column
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
