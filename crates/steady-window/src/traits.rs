//! Core traits for window-based steady-state detection

use std::ops::Range;

use crate::types::{CandidateVerdict, MeanRecord};
use steady_core::TimeSeries;

/// Decides whether the rows around a center row are stable.
///
/// Windows are passed as row ranges into `series`; `center` is the row whose
/// values the windows are compared against.
pub trait StabilityEvaluator: Send + Sync {
    /// Evaluate one candidate
    fn evaluate(
        &self,
        series: &TimeSeries,
        before: Range<usize>,
        after: Range<usize>,
        center: usize,
    ) -> CandidateVerdict;

    /// Name of the evaluation method, used in logs
    fn method_name(&self) -> &str;

    /// Boolean form of [`StabilityEvaluator::evaluate`]
    fn is_stable(
        &self,
        series: &TimeSeries,
        before: Range<usize>,
        after: Range<usize>,
        center: usize,
    ) -> bool {
        self.evaluate(series, before, after, center).is_stable()
    }
}

/// Summarizes the rows of a confirmed window
pub trait WindowAggregator: Send + Sync {
    /// Aggregate `window` rows, stamping the record with the center's time
    fn aggregate_window(&self, series: &TimeSeries, window: Range<usize>, center: usize) -> MeanRecord;
}
