//! Declarative analysis configuration
//!
//! A rule file names the time column, the window length, the columns to
//! average, equality filters and per-column stability margins:
//!
//! ```yaml
//! time_window: 1
//! time_column: Time
//! row_to_remove: "2024-11-15 11:20:43"
//! mean_values: [col1, col2, col3]
//! conditions: { col9: 5 }
//! margins:
//!   - { column: col1, margin: 1 }
//!   - { column: col3, margin: 0.5 }
//! ```
//!
//! The file is loosely typed; [`AnalysisConfig::validate`] turns it into the
//! strongly typed [`ValidatedConfig`] once, so the engine never sees raw
//! configuration values.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use config::ValueKind;
use serde::{Deserialize, Serialize};
use steady_core::parse_strict;
use steady_window::{ScanParameters, StabilityRule};
use tracing::{info, warn};

use crate::filter::FilterSpec;
use crate::{Error, Result};

pub use config::FileFormat;

/// One stability margin as written in the rule file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarginEntry {
    /// Column the margin applies to
    pub column: String,

    /// Maximum allowed deviation from the center value
    pub margin: f64,
}

/// Raw analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Total window length in minutes
    pub time_window: i64,

    /// Timestamp of a row to drop before analysis, `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub row_to_remove: Option<String>,

    /// Name of the time column
    pub time_column: String,

    /// Columns averaged around each operational point
    pub mean_values: Vec<String>,

    /// Equality filters, `column: value`
    #[serde(default)]
    pub conditions: BTreeMap<String, i64>,

    /// Stability margins
    pub margins: Vec<MarginEntry>,
}

/// Configuration after validation, split by consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    /// Parameters for the scan
    pub scan: ScanParameters,

    /// Row removal, projection and equality filtering
    pub filter: FilterSpec,
}

impl ValidatedConfig {
    pub fn time_column(&self) -> &str {
        &self.scan.time_column
    }

    /// Mean, condition and margin columns, lowercased and de-duplicated
    pub fn needed_columns(&self) -> &[String] {
        &self.filter.columns
    }
}

impl AnalysisConfig {
    /// Load a rule file; the format follows the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Configuration file {} not found", path.display()),
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        require_whole_numbers(&settings)?;
        let parsed: Self = settings.try_deserialize()?;

        info!(path = %path.display(), "Configuration file loaded successfully");
        Ok(parsed)
    }

    /// Parse rule-file text in the given format
    pub fn parse(text: &str, format: FileFormat) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, format))
            .build()?;
        require_whole_numbers(&settings)?;
        Ok(settings.try_deserialize()?)
    }

    /// Load and validate in one step
    pub fn load_validated(path: impl AsRef<Path>) -> Result<ValidatedConfig> {
        let validated = Self::load(path)?.validate()?;
        info!("Configuration validated successfully");
        Ok(validated)
    }

    /// Check every field and build the typed parameter bundles
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let time_window_minutes = u32::try_from(self.time_window).map_err(|_| {
            Error::InvalidParameter(format!(
                "time_window must be 0 or a positive integer, got {}",
                self.time_window
            ))
        })?;

        let time_column = self.time_column.trim().to_lowercase();
        if time_column.is_empty() {
            return Err(Error::InvalidParameter(
                "time_column must be a non-empty string".to_string(),
            ));
        }

        if self.mean_values.is_empty() {
            return Err(steady_core::Error::EmptyParameter("mean_values".to_string()).into());
        }
        if self.margins.is_empty() {
            return Err(steady_core::Error::EmptyParameter("margins".to_string()).into());
        }

        let mut margins = Vec::with_capacity(self.margins.len());
        for entry in &self.margins {
            if entry.column.trim().is_empty() {
                return Err(Error::InvalidParameter(
                    "each margin entry must name a column".to_string(),
                ));
            }
            if !(entry.margin.is_finite() && entry.margin > 0.0) {
                return Err(steady_core::Error::InvalidTolerance {
                    column: entry.column.clone(),
                    tolerance: entry.margin,
                }
                .into());
            }
            margins.push(StabilityRule::new(entry.column.trim(), entry.margin));
        }

        let row_to_remove = self
            .row_to_remove
            .as_deref()
            .map(parse_row_to_remove)
            .transpose()?;

        let mean_values: Vec<String> = self
            .mean_values
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();
        let conditions: Vec<(String, i64)> = self
            .conditions
            .iter()
            .map(|(c, v)| (c.trim().to_lowercase(), *v))
            .collect();

        let mut columns: Vec<String> = Vec::new();
        let candidates = mean_values
            .iter()
            .chain(conditions.iter().map(|(c, _)| c))
            .chain(margins.iter().map(|r| &r.column));
        for column in candidates {
            if *column == time_column {
                continue;
            }
            if columns.contains(column) {
                continue;
            }
            columns.push(column.clone());
        }
        if mean_values.len() > mean_values.iter().collect::<std::collections::HashSet<_>>().len() {
            warn!("mean_values lists a column more than once");
        }

        Ok(ValidatedConfig {
            scan: ScanParameters::new(
                time_column.clone(),
                mean_values,
                margins,
                time_window_minutes,
            ),
            filter: FilterSpec {
                time_column,
                columns,
                conditions,
                row_to_remove,
            },
        })
    }
}

// `config` rounds floats when asked for an integer, so integer fields are
// checked on the raw values first
fn require_whole_numbers(settings: &config::Config) -> Result<()> {
    if let Ok(value) = settings.get::<config::Value>("time_window") {
        ensure_whole("time_window", &value)?;
    }
    if let Ok(conditions) = settings.get_table("conditions") {
        for (column, value) in &conditions {
            ensure_whole(&format!("conditions.{column}"), value)?;
        }
    }
    Ok(())
}

fn ensure_whole(key: &str, value: &config::Value) -> Result<()> {
    match value.kind {
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => Ok(()),
        _ => Err(Error::InvalidParameter(format!(
            "'{key}' expects an integer, got {value}"
        ))),
    }
}

fn parse_row_to_remove(raw: &str) -> Result<NaiveDateTime> {
    parse_strict(raw).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "Invalid datetime format for 'row_to_remove': {raw}. Expected format: 'YYYY-MM-DD HH:MM:SS'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
time_window: 1
time_column: Time
row_to_remove: "2024-11-15 11:20:43"
mean_values: [Col1, col2, col3]
conditions:
  col9: 5
margins:
  - column: col1
    margin: 1
  - column: COL3
    margin: 0.5
"#;

    fn base() -> AnalysisConfig {
        AnalysisConfig::parse(YAML, FileFormat::Yaml).unwrap()
    }

    #[test]
    fn test_parse_yaml() {
        let cfg = base();
        assert_eq!(cfg.time_window, 1);
        assert_eq!(cfg.margins.len(), 2);
        assert_eq!(cfg.margins[0].margin, 1.0);
        assert_eq!(cfg.conditions.get("col9"), Some(&5));
    }

    #[test]
    fn test_validate_builds_typed_parameters() {
        let validated = base().validate().unwrap();

        assert_eq!(validated.time_column(), "time");
        assert_eq!(validated.scan.time_window_minutes, 1);
        assert_eq!(validated.scan.mean_value_columns, vec!["col1", "col2", "col3"]);
        assert_eq!(
            validated.scan.margins,
            vec![StabilityRule::new("col1", 1.0), StabilityRule::new("col3", 0.5)]
        );
        assert_eq!(validated.needed_columns(), &["col1", "col2", "col3", "col9"]);
        assert_eq!(validated.filter.conditions, vec![("col9".to_string(), 5)]);
        assert!(validated.filter.row_to_remove.is_some());
    }

    #[test]
    fn test_conditions_and_row_to_remove_are_optional() {
        let yaml = r#"
time_window: 4
time_column: time
mean_values: [a]
margins:
  - { column: a, margin: 2.5 }
"#;
        let validated = AnalysisConfig::parse(yaml, FileFormat::Yaml)
            .unwrap()
            .validate()
            .unwrap();
        assert!(validated.filter.conditions.is_empty());
        assert_eq!(validated.filter.row_to_remove, None);
        assert_eq!(validated.needed_columns(), &["a"]);
    }

    #[test]
    fn test_negative_window_rejected() {
        let mut cfg = base();
        cfg.time_window = -1;
        assert!(matches!(cfg.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_lists_rejected() {
        let mut cfg = base();
        cfg.mean_values.clear();
        assert!(matches!(
            cfg.validate(),
            Err(Error::SteadyCore(steady_core::Error::EmptyParameter(_)))
        ));

        let mut cfg = base();
        cfg.margins.clear();
        assert!(matches!(
            cfg.validate(),
            Err(Error::SteadyCore(steady_core::Error::EmptyParameter(_)))
        ));
    }

    #[test]
    fn test_non_positive_margin_rejected() {
        for margin in [0.0, -2.0] {
            let mut cfg = base();
            cfg.margins[1].margin = margin;
            assert!(matches!(
                cfg.validate(),
                Err(Error::SteadyCore(steady_core::Error::InvalidTolerance { .. }))
            ));
        }
    }

    #[test]
    fn test_invalid_row_to_remove_format() {
        let mut cfg = base();
        cfg.row_to_remove = Some("invalid-date-format".to_string());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Expected format: 'YYYY-MM-DD HH:MM:SS'"));
    }

    #[test]
    fn test_empty_time_column_rejected() {
        let mut cfg = base();
        cfg.time_column = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let yaml = "time_window: 1\ntime_column: time\nmargins: []\n";
        assert!(matches!(
            AnalysisConfig::parse(yaml, FileFormat::Yaml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_fractional_condition_rejected() {
        let yaml = YAML.replace("col9: 5", "col9: 5.6");
        let err = AnalysisConfig::parse(&yaml, FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(ref msg) if msg.contains("conditions.col9")));
    }

    #[test]
    fn test_fractional_time_window_rejected() {
        let yaml = YAML.replace("time_window: 1", "time_window: 1.7");
        let err = AnalysisConfig::parse(&yaml, FileFormat::Yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(ref msg) if msg.contains("time_window")));
    }

    #[test]
    fn test_text_condition_rejected() {
        let yaml = YAML.replace("col9: 5", "col9: \"five\"");
        assert!(matches!(
            AnalysisConfig::parse(&yaml, FileFormat::Yaml),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
time_window = 2
time_column = "Time"
mean_values = ["flow"]

[[margins]]
column = "flow"
margin = 0.25
"#;
        let validated = AnalysisConfig::parse(toml, FileFormat::Toml)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(validated.scan.time_window_minutes, 2);
        assert_eq!(validated.scan.margins, vec![StabilityRule::new("flow", 0.25)]);
    }
}
