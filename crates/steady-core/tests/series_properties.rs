//! Property-based tests for series construction

use proptest::prelude::*;
use steady_core::chrono::{Duration, NaiveDate, NaiveDateTime};
use steady_core::TimeSeries;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 12)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

proptest! {
    // Property: sorting keeps every (time, value) pair together
    #[test]
    fn prop_from_unsorted_keeps_rows_intact(offsets in prop::collection::vec(0i64..500, 0..60)) {
        let times: Vec<NaiveDateTime> = offsets.iter().map(|&s| base() + Duration::seconds(s)).collect();
        let values: Vec<f64> = offsets.iter().map(|&s| s as f64 * 2.0).collect();

        let series = TimeSeries::from_unsorted("time", times, vec![("v".to_string(), values)]).unwrap();

        prop_assert_eq!(series.len(), offsets.len());
        prop_assert!(series.times().windows(2).all(|w| w[0] <= w[1]));

        let column = series.column("v").unwrap();
        for (t, v) in series.times().iter().zip(column) {
            let secs = (*t - base()).num_seconds();
            prop_assert_eq!(*v, secs as f64 * 2.0);
        }
    }

    // Property: retaining every row is the identity
    #[test]
    fn prop_retain_all_is_identity(n in 0usize..40) {
        let times: Vec<NaiveDateTime> = (0..n as i64).map(|i| base() + Duration::minutes(i)).collect();
        let series = TimeSeries::new("time", times)
            .unwrap()
            .with_column("v", (0..n).map(|i| i as f64).collect())
            .unwrap();

        prop_assert_eq!(series.retain_rows(|_| true), series);
    }
}
