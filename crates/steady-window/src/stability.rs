//! Split-window tolerance evaluation
//!
//! A candidate row is stable when, for every rule, each value in its
//! before-window and in its after-window lies within the rule's tolerance of
//! the candidate's own value. The candidate is never compared with itself.

use std::ops::Range;

use crate::traits::StabilityEvaluator;
use crate::types::{CandidateVerdict, RejectReason, StabilityRule};
use steady_core::{Error, Result, TimeSeries};

/// A rule bound to a column position in a specific series
#[derive(Debug, Clone, PartialEq)]
struct ResolvedRule {
    column: String,
    index: usize,
    tolerance: f64,
}

/// Tolerance evaluator with rules resolved against one series
#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceEvaluator {
    rules: Vec<ResolvedRule>,
}

impl ToleranceEvaluator {
    /// Resolve rules to column positions.
    ///
    /// A rule naming a column absent from `series` is a configuration error,
    /// reported here once rather than per row.
    pub fn resolve(series: &TimeSeries, rules: &[StabilityRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let index = series
                    .column_index(&rule.column)
                    .ok_or_else(|| Error::missing_column(&rule.column, "margins"))?;
                Ok(ResolvedRule {
                    column: rule.column.clone(),
                    index,
                    tolerance: rule.tolerance,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    // deviation of the first value in `rows` outside the tolerance; NaN
    // counts as outside
    fn first_violation(values: &[f64], rows: Range<usize>, center_value: f64, tolerance: f64) -> Option<f64> {
        values[rows].iter().find_map(|&v| {
            let deviation = (v - center_value).abs();
            // written so that NaN fails
            if deviation <= tolerance {
                None
            } else {
                Some(deviation)
            }
        })
    }
}

impl StabilityEvaluator for ToleranceEvaluator {
    fn evaluate(
        &self,
        series: &TimeSeries,
        before: Range<usize>,
        after: Range<usize>,
        center: usize,
    ) -> CandidateVerdict {
        if before.is_empty() {
            return CandidateVerdict::Rejected(RejectReason::EmptyBeforeWindow);
        }
        if after.is_empty() {
            return CandidateVerdict::Rejected(RejectReason::EmptyAfterWindow);
        }

        for rule in &self.rules {
            let values = series.column_at(rule.index);
            let center_value = values[center];

            let violation = Self::first_violation(values, before.clone(), center_value, rule.tolerance)
                .or_else(|| Self::first_violation(values, after.clone(), center_value, rule.tolerance));

            if let Some(deviation) = violation {
                return CandidateVerdict::Rejected(RejectReason::ToleranceExceeded {
                    column: rule.column.clone(),
                    deviation,
                    tolerance: rule.tolerance,
                });
            }
        }

        CandidateVerdict::Stable
    }

    fn method_name(&self) -> &str {
        "split-window tolerance"
    }
}
