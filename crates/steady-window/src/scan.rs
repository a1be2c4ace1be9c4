//! Scan controller: walks candidates in time order and records steady points
//!
//! The walk is a small state machine. A candidate that fails advances the
//! scan by one row; a confirmed point jumps the scan a full half-window
//! forward so that neighbouring rows of the same steady episode are not
//! reported again and aggregation windows of distinct points do not overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use steady_core::{Error, Result, TimeSeries};
use tracing::{debug, info, trace};

use crate::aggregate::WindowMean;
use crate::stability::ToleranceEvaluator;
use crate::traits::{StabilityEvaluator, WindowAggregator};
use crate::types::{CandidateVerdict, OperationalPoint, RejectReason, ScanOutcome, ScanParameters};
use crate::window_index::WindowIndex;

/// Position of the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking at the next candidate row
    Seeking(usize),

    /// Checking the stability of the row
    Evaluating(usize),

    /// Row confirmed; aggregate and skip ahead
    Recording(usize),

    /// No candidates left
    Done,
}

/// Drives one scan pass over a series
pub struct ScanController<'a, E = ToleranceEvaluator, A = WindowMean> {
    series: &'a TimeSeries,
    index: WindowIndex<'a>,
    evaluator: E,
    aggregator: A,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> ScanController<'a> {
    /// Validate `params` against `series` and resolve all rules and columns.
    ///
    /// Every configuration error surfaces here, before any candidate is
    /// looked at.
    pub fn new(series: &'a TimeSeries, params: &ScanParameters) -> Result<Self> {
        params.validate(series)?;

        // column lookups are meaningless without rows
        if series.is_empty() {
            return Ok(Self::with_parts(
                series,
                params,
                ToleranceEvaluator::resolve(series, &[])?,
                WindowMean::resolve::<&str>(series, &[], &params.time_column)?,
            ));
        }

        let evaluator = ToleranceEvaluator::resolve(series, &params.margins)?;
        let aggregator =
            WindowMean::resolve(series, &params.mean_value_columns, &params.time_column)?;
        debug!(
            rules = evaluator.rule_count(),
            mean_columns = aggregator.column_names().count(),
            "scan parameters resolved"
        );
        Ok(Self::with_parts(series, params, evaluator, aggregator))
    }
}

impl<'a, E, A> ScanController<'a, E, A>
where
    E: StabilityEvaluator,
    A: WindowAggregator,
{
    /// Build a controller from already-resolved parts
    pub fn with_parts(series: &'a TimeSeries, params: &ScanParameters, evaluator: E, aggregator: A) -> Self {
        Self {
            series,
            index: WindowIndex::new(series, params.half_window()),
            evaluator,
            aggregator,
            cancel: None,
        }
    }

    /// Abort with [`Error::Cancelled`] once `flag` is raised.
    ///
    /// The flag is read before each candidate.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the scan to completion
    pub fn run(self) -> Result<ScanOutcome> {
        let mut outcome = ScanOutcome::default();
        let half = self.index.half_window();

        info!(
            rows = self.series.len(),
            half_window_ms = half.num_milliseconds(),
            method = self.evaluator.method_name(),
            "Starting analysis of operational points"
        );

        let mut state = match self.index.start_candidate() {
            Some(idx) => ScanState::Seeking(idx),
            None => {
                debug!("no row lies a half-window after the series start");
                ScanState::Done
            }
        };

        loop {
            state = match state {
                ScanState::Seeking(idx) => {
                    if let Some(flag) = &self.cancel {
                        if flag.load(Ordering::Relaxed) {
                            return Err(Error::Cancelled {
                                visited: outcome.statistics.candidates,
                            });
                        }
                    }
                    if idx >= self.index.len() {
                        ScanState::Done
                    } else {
                        ScanState::Evaluating(idx)
                    }
                }

                ScanState::Evaluating(idx) => {
                    let verdict = self.evaluate(idx);
                    outcome.statistics.record(&verdict);

                    match verdict {
                        CandidateVerdict::Stable => ScanState::Recording(idx),
                        CandidateVerdict::Rejected(reason) => {
                            debug!(
                                row = idx,
                                time = %self.index.time(idx),
                                ?reason,
                                "no operational point"
                            );
                            ScanState::Seeking(idx + 1)
                        }
                    }
                }

                ScanState::Recording(idx) => {
                    let t = self.index.time(idx);
                    let window = self.index.aggregation_range(idx);
                    let record = self.aggregator.aggregate_window(self.series, window, idx);

                    debug!(row = idx, time = %t, means = ?record.means, "operational point identified");
                    outcome.points.push(OperationalPoint { timestamp: t, row: idx });
                    outcome.records.push(record);

                    let next_time = t + half;
                    match self.index.last_time() {
                        Some(last) if next_time <= last => match self.index.first_at_or_after(next_time) {
                            Some(next) => ScanState::Seeking(next.max(idx + 1)),
                            None => ScanState::Done,
                        },
                        _ => ScanState::Done,
                    }
                }

                ScanState::Done => break,
            };
        }

        let stats = outcome.statistics;
        info!(
            points = stats.points,
            candidates = stats.candidates,
            empty_window = stats.empty_window_rejections,
            out_of_tolerance = stats.tolerance_rejections,
            "Finished analysis of operational points"
        );

        Ok(outcome)
    }

    fn evaluate(&self, idx: usize) -> CandidateVerdict {
        let before = self.index.before_range(idx);
        let after = self.index.after_range(idx);
        trace!(row = idx, ?before, ?after, "candidate windows");

        if before.is_empty() {
            return CandidateVerdict::Rejected(RejectReason::EmptyBeforeWindow);
        }
        if after.is_empty() {
            return CandidateVerdict::Rejected(RejectReason::EmptyAfterWindow);
        }
        self.evaluator.evaluate(self.series, before, after, idx)
    }
}

/// Find the operational points of `series` and their window means.
///
/// Configuration errors are returned before scanning; a series without any
/// steady point yields an empty outcome.
pub fn scan(series: &TimeSeries, params: &ScanParameters) -> Result<ScanOutcome> {
    ScanController::new(series, params)?.run()
}

/// Run independent scans of one series, one per parameter bundle.
///
/// Results keep the order of `params`.
#[cfg(feature = "parallel")]
pub fn scan_batch(series: &TimeSeries, params: &[ScanParameters]) -> Vec<Result<ScanOutcome>> {
    use rayon::prelude::*;

    params.par_iter().map(|p| scan(series, p)).collect()
}

/// Run independent scans of one series, one per parameter bundle.
///
/// Results keep the order of `params`.
#[cfg(not(feature = "parallel"))]
pub fn scan_batch(series: &TimeSeries, params: &[ScanParameters]) -> Vec<Result<ScanOutcome>> {
    params.iter().map(|p| scan(series, p)).collect()
}
