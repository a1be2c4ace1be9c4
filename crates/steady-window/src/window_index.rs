//! Time-based row lookup over a sorted series
//!
//! Every window is expressed as a half-open range of row indices into the
//! series, found by binary search on the time column.

use std::ops::Range;

use chrono::{Duration, NaiveDateTime};
use steady_core::TimeSeries;

/// Index of the first row whose time is `>= t`, or `None` past the end
pub fn first_at_or_after(series: &TimeSeries, t: NaiveDateTime) -> Option<usize> {
    let idx = series.times().partition_point(|&x| x < t);
    (idx < series.len()).then_some(idx)
}

/// First row whose before-window cannot be truncated by the series start
pub fn start_candidate(series: &TimeSeries, half_window: Duration) -> Option<usize> {
    let first = series.first_time()?;
    first_at_or_after(series, first + half_window)
}

/// Window lookups for a fixed series and half-window
#[derive(Debug, Clone, Copy)]
pub struct WindowIndex<'a> {
    times: &'a [NaiveDateTime],
    half: Duration,
}

impl<'a> WindowIndex<'a> {
    pub fn new(series: &'a TimeSeries, half: Duration) -> Self {
        Self {
            times: series.times(),
            half,
        }
    }

    pub fn half_window(&self) -> Duration {
        self.half
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn time(&self, row: usize) -> NaiveDateTime {
        self.times[row]
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.times.last().copied()
    }

    /// First row with time `>= t`
    pub fn first_at_or_after(&self, t: NaiveDateTime) -> Option<usize> {
        let idx = self.lower_bound(t);
        (idx < self.times.len()).then_some(idx)
    }

    /// First row at or after `start + half`
    pub fn start_candidate(&self) -> Option<usize> {
        let first = *self.times.first()?;
        self.first_at_or_after(first + self.half)
    }

    /// Rows with time in `[T - half, T)` for the row at `center`
    pub fn before_range(&self, center: usize) -> Range<usize> {
        let t = self.times[center];
        self.lower_bound(t - self.half)..self.lower_bound(t)
    }

    /// Rows with time in `(T, T + half]` for the row at `center`
    pub fn after_range(&self, center: usize) -> Range<usize> {
        let t = self.times[center];
        self.upper_bound(t)..self.upper_bound(t + self.half)
    }

    /// Rows with time in `[T - half, T + half]` for the row at `center`
    pub fn aggregation_range(&self, center: usize) -> Range<usize> {
        let t = self.times[center];
        self.inclusive_range(t - self.half, t + self.half)
    }

    /// Rows with time in `[start, end]`; empty when `end < start`
    pub fn inclusive_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Range<usize> {
        let lo = self.lower_bound(start);
        let hi = self.upper_bound(end).max(lo);
        lo..hi
    }

    // first index with time >= t
    fn lower_bound(&self, t: NaiveDateTime) -> usize {
        self.times.partition_point(|&x| x < t)
    }

    // first index with time > t
    fn upper_bound(&self, t: NaiveDateTime) -> usize {
        self.times.partition_point(|&x| x <= t)
    }
}
