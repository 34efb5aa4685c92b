use crate::timeline::aligner::{reference_ordinal0, REFERENCE_YEAR, REFERENCE_YEAR_DAYS};
use crate::timeline::bucket::TimelineBucket;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// One labelled day of the timeline around the target date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub offset: i32,
    /// `None` when no historical day at this offset had a known exceedance flag.
    pub probability_pct: Option<f64>,
    pub sample_count: u32,
    pub exceed_count: u32,
    /// `"Mar 01"`.
    pub label: String,
    /// `"Sat"`.
    pub weekday: String,
    /// `"SAT"`.
    pub weekday_short: String,
}

/// The reference-year day `offset` days from `target`, together with the number of year
/// boundaries crossed (-1, 0 or 1).
fn reference_day(target: NaiveDate, offset: i32) -> Option<(NaiveDate, i32)> {
    let ordinal0 = reference_ordinal0(target.month(), target.day())? + offset;
    let year_shift = ordinal0.div_euclid(REFERENCE_YEAR_DAYS);
    let start = NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1)?;
    let day = start.checked_add_signed(Duration::days(
        ordinal0.rem_euclid(REFERENCE_YEAR_DAYS) as i64,
    ))?;
    Some((day, year_shift))
}

impl TimelineEntry {
    /// Labels `bucket` with the month/day found `offset` days from `target` on the
    /// reference year, so that labels agree with how samples were aligned.
    ///
    /// The weekday is the one of that month/day in the target's calendar. February 29
    /// in a common year takes the weekday of `target + offset` days.
    pub fn from_bucket(bucket: &TimelineBucket, target: NaiveDate) -> Self {
        let (label, weekday) = match reference_day(target, bucket.offset) {
            Some((day, year_shift)) => {
                let label = day.format("%b %d").to_string();
                let weekday = day
                    .with_year(target.year() + year_shift)
                    .or_else(|| target.checked_add_signed(Duration::days(bucket.offset as i64)))
                    .map(|date| date.format("%a").to_string())
                    .unwrap_or_default();
                (label, weekday)
            }
            None => (format!("{:+}", bucket.offset), String::new()),
        };
        TimelineEntry {
            offset: bucket.offset,
            probability_pct: bucket.probability_pct(),
            sample_count: bucket.sample_count,
            exceed_count: bucket.exceed_count,
            label,
            weekday_short: weekday.to_uppercase(),
            weekday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::build_timeline;
    use crate::types::condition::Condition;
    use crate::types::response::DaySample;

    #[test]
    fn test_labels_month_day_and_weekday() {
        let target = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let bucket = TimelineBucket {
            offset: -4,
            sample_count: 4,
            exceed_count: 1,
            raw_metric_values: vec![],
        };
        let entry = TimelineEntry::from_bucket(&bucket, target);
        assert_eq!(entry.label, "Mar 01");
        assert_eq!(entry.weekday, "Sat");
        assert_eq!(entry.weekday_short, "SAT");
        assert_eq!(entry.probability_pct, Some(25.0));
        assert_eq!(entry.exceed_count, 1);
    }

    #[test]
    fn test_labels_cross_year_boundary() {
        let target = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let entry = TimelineEntry::from_bucket(&TimelineBucket::empty(-7), target);
        assert_eq!(entry.label, "Dec 29");
        assert_eq!(entry.weekday_short, "MON");
        assert_eq!(entry.probability_pct, None);

        let target = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        let entry = TimelineEntry::from_bucket(&TimelineBucket::empty(3), target);
        assert_eq!(entry.label, "Jan 02");
        assert_eq!(entry.weekday, "Fri");
    }

    #[test]
    fn test_labels_around_leap_day_in_common_year() {
        let target = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let samples = vec![
            DaySample::new("2001-02-28", Some(true)),
            DaySample::new("2004-02-29", Some(false)),
            DaySample::new("2001-03-02", Some(true)),
        ];
        let timeline = build_timeline(&samples, Condition::Hot, target, 5);
        let labels: Vec<_> = timeline
            .iter()
            .map(|entry| (entry.offset, entry.label.as_str(), entry.weekday.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![(-2, "Feb 28", "Tue"), (-1, "Feb 29", "Tue"), (1, "Mar 02", "Thu")]
        );
    }
}
