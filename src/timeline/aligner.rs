use crate::timeline::bucket::TimelineBucket;
use crate::types::response::DaySample;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Calendar year every month/day pair is projected onto. A leap year, so that
/// February 29 samples stay representable.
pub const REFERENCE_YEAR: i32 = 2000;
pub(crate) const REFERENCE_YEAR_DAYS: i32 = 366;
const HALF_REFERENCE_YEAR: i32 = REFERENCE_YEAR_DAYS / 2;

/// Zero-based day of the reference year for a month/day pair.
pub(crate) fn reference_ordinal0(month: u32, day: u32) -> Option<i32> {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(|date| date.ordinal0() as i32)
}

/// Folds a naive day difference on the reference year into `(-183, 183]`, the
/// representation closest to the target across the year boundary.
fn fold(naive_offset: i32) -> i32 {
    let offset = naive_offset.rem_euclid(REFERENCE_YEAR_DAYS);
    if offset > HALF_REFERENCE_YEAR {
        offset - REFERENCE_YEAR_DAYS
    } else {
        offset
    }
}

/// Maps year-agnostic historical samples onto signed day offsets around a target date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cronoweath::DayOffsetAligner;
///
/// let target = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let aligner = DayOffsetAligner::new(target, 10);
///
/// // December 29 is seven days before January 5, across the year boundary.
/// assert_eq!(aligner.offset_for(12, 29), Some(-7));
/// // Mid-year dates are outside the window.
/// assert_eq!(aligner.offset_for(7, 1), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOffsetAligner {
    target: NaiveDate,
    target_ordinal0: i32,
    window_days: i32,
}

impl DayOffsetAligner {
    pub fn new(target: NaiveDate, window_days: u32) -> Self {
        let target_ordinal0 = reference_ordinal0(target.month(), target.day())
            .unwrap_or_else(|| target.ordinal0() as i32);
        Self {
            target,
            target_ordinal0,
            window_days: window_days.min(REFERENCE_YEAR_DAYS as u32) as i32,
        }
    }

    pub fn target(&self) -> NaiveDate {
        self.target
    }

    pub fn window_days(&self) -> u32 {
        self.window_days as u32
    }

    /// Signed offset of `month`/`day` from the target, or `None` when the pair is not a
    /// calendar day or falls outside `[-window_days, window_days]`.
    pub fn offset_for(&self, month: u32, day: u32) -> Option<i32> {
        let ordinal0 = reference_ordinal0(month, day)?;
        let offset = fold(ordinal0 - self.target_ordinal0);
        (offset.abs() <= self.window_days).then_some(offset)
    }

    /// Aggregates `samples` into one bucket per offset, sorted by offset.
    ///
    /// Rows with a missing or malformed date, or outside the window, are skipped. Rows
    /// with an unknown `exceed` flag still contribute their metric value. The metric
    /// value of a row is the first of `metrics` it has a value for.
    pub fn align(&self, samples: &[DaySample], metrics: &[&str]) -> Vec<TimelineBucket> {
        let mut buckets: BTreeMap<i32, TimelineBucket> = BTreeMap::new();

        for sample in samples {
            let Some(offset) = sample
                .month_day()
                .and_then(|(month, day)| self.offset_for(month, day))
            else {
                continue;
            };
            let metric = metrics.iter().find_map(|name| sample.metric(name));
            buckets
                .entry(offset)
                .or_insert_with(|| TimelineBucket::empty(offset))
                .record(sample.exceed, metric);
        }

        buckets.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_fold_range() {
        assert_eq!(fold(0), 0);
        assert_eq!(fold(359), -7);
        assert_eq!(fold(-359), 7);
        assert_eq!(fold(183), 183);
        assert_eq!(fold(-183), 183);
        assert_eq!(fold(184), -182);
        assert_eq!(fold(-365), 1);
    }

    #[test]
    fn test_wraparound_backwards_across_new_year() {
        let aligner = DayOffsetAligner::new(date(2025, 1, 5), 10);
        assert_eq!(aligner.offset_for(12, 29), Some(-7));
        assert_eq!(aligner.offset_for(12, 26), Some(-10));
        assert_eq!(aligner.offset_for(12, 25), None);
    }

    #[test]
    fn test_wraparound_forwards_across_new_year() {
        let aligner = DayOffsetAligner::new(date(2024, 12, 28), 15);
        assert_eq!(aligner.offset_for(1, 2), Some(5));
        assert_eq!(aligner.offset_for(12, 13), Some(-15));
        assert_eq!(aligner.offset_for(1, 12), Some(15));
        assert_eq!(aligner.offset_for(1, 13), None);
    }

    #[test]
    fn test_reference_year_is_leap() {
        let aligner = DayOffsetAligner::new(date(2023, 3, 1), 15);
        assert_eq!(aligner.offset_for(2, 29), Some(-1));
        assert_eq!(aligner.offset_for(2, 28), Some(-2));
        assert_eq!(aligner.offset_for(2, 30), None);
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let aligner = DayOffsetAligner::new(date(2025, 6, 15), 3);
        assert_eq!(aligner.offset_for(6, 12), Some(-3));
        assert_eq!(aligner.offset_for(6, 18), Some(3));
        assert_eq!(aligner.offset_for(6, 19), None);
    }

    #[test]
    fn test_wide_window_keeps_offsets_unique() {
        let aligner = DayOffsetAligner::new(date(2025, 1, 1), 300);
        let samples: Vec<DaySample> = (1..=12)
            .flat_map(|month| {
                (1..=28).map(move |day| DaySample::new(format!("1990-{month:02}-{day:02}"), Some(false)))
            })
            .collect();
        let buckets = aligner.align(&samples, &[]);
        assert_eq!(buckets.len(), 12 * 28);
        assert!(buckets.windows(2).all(|pair| pair[0].offset < pair[1].offset));
        assert!(buckets.iter().all(|bucket| (-182..=183).contains(&bucket.offset)));
    }

    #[test]
    fn test_align_accumulates_years_per_offset() {
        let aligner = DayOffsetAligner::new(date(2025, 3, 10), 2);
        let samples = vec![
            DaySample::new("2001-03-10", Some(true)).with_metric("t2m_max", Some(30.0)),
            DaySample::new("2002-03-10", Some(true)).with_metric("t2m_max", Some(32.0)),
            DaySample::new("2003-03-10", Some(false)).with_metric("hi_max", Some(28.0)),
            DaySample::new("2004-03-10", Some(true)),
            DaySample::new("2004-03-11", None).with_metric("t2m_max", Some(25.0)),
            DaySample::new("2004-03-20", Some(true)),
            DaySample::new("garbage", Some(true)),
            DaySample::default(),
        ];

        let buckets = aligner.align(&samples, &["t2m_max", "hi_max"]);
        assert_eq!(buckets.len(), 2);

        let center = &buckets[0];
        assert_eq!(center.offset, 0);
        assert_eq!(center.sample_count, 4);
        assert_eq!(center.exceed_count, 3);
        assert_eq!(center.raw_metric_values, [30.0, 32.0, 28.0]);
        assert_eq!(center.probability_pct(), Some(75.0));

        let next = &buckets[1];
        assert_eq!(next.offset, 1);
        assert_eq!(next.sample_count, 0);
        assert_eq!(next.raw_metric_values, [25.0]);
        assert_eq!(next.probability_pct(), None);
    }
}
