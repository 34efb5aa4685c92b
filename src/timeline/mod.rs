//! Projection of year-agnostic historical samples onto a day-offset timeline around
//! the target date.

pub mod aligner;
pub mod bucket;
pub mod entry;

use crate::timeline::aligner::DayOffsetAligner;
use crate::timeline::entry::TimelineEntry;
use crate::types::condition::Condition;
use crate::types::response::DaySample;
use chrono::NaiveDate;

/// Rounds to one decimal place, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The full labelled timeline of `condition` for `target`, one entry per offset that
/// has at least one sample, sorted by offset.
pub fn build_timeline(
    samples: &[DaySample],
    condition: Condition,
    target: NaiveDate,
    window_days: u32,
) -> Vec<TimelineEntry> {
    DayOffsetAligner::new(target, window_days)
        .align(samples, condition.metrics())
        .iter()
        .map(|bucket| TimelineEntry::from_bucket(bucket, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(12.25), 12.3);
        assert_eq!(round1(-3.04), -3.0);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn test_build_timeline_around_target() {
        let target = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let samples: Vec<DaySample> = (1990..2000)
            .flat_map(|year| {
                (10..=31).map(move |day| {
                    DaySample::new(format!("{year}-07-{day:02}"), Some(year % 2 == 0))
                        .with_metric("t2m_max", Some(30.0))
                })
            })
            .collect();

        let timeline = build_timeline(&samples, Condition::Hot, target, 5);
        let offsets: Vec<i32> = timeline.iter().map(|entry| entry.offset).collect();
        assert_eq!(offsets, (-5..=5).collect::<Vec<_>>());
        assert!(timeline
            .iter()
            .all(|entry| entry.sample_count == 10 && entry.probability_pct == Some(50.0)));
        assert_eq!(timeline[5].label, "Jul 20");
    }
}
