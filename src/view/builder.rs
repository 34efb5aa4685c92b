use crate::calendar::format_card_date;
use crate::timeline::aligner::DayOffsetAligner;
use crate::timeline::bucket::TimelineBucket;
use crate::timeline::entry::TimelineEntry;
use crate::timeline::round1;
use crate::types::catalog::DEFAULT_WINDOW_DAYS;
use crate::types::condition::Condition;
use crate::types::response::{QueryResponse, YearsInfo};
use crate::view::icon::choose_icon;
use crate::view::thresholds::{describe_thresholds, statistic_unit};
use crate::view::{ConditionView, Histogram, Statistic, SummaryCard, ViewSummary};
use chrono::NaiveDate;
use ordered_float::OrderedFloat;

pub const FOCUS_LEN: usize = 7;
const FOCUS_HALF: usize = FOCUS_LEN / 2;

/// The at most seven entries shown in the histogram.
///
/// Centered on offset 0, or on the entry whose offset is closest to it (the earlier one
/// on ties), and shifted so that a timeline with more than seven entries always yields
/// exactly seven.
pub fn focus_window(timeline: &[TimelineEntry]) -> &[TimelineEntry] {
    if timeline.len() <= FOCUS_LEN {
        return timeline;
    }
    let center = timeline
        .iter()
        .enumerate()
        .min_by_key(|(_, entry)| entry.offset.unsigned_abs())
        .map(|(index, _)| index)
        .unwrap_or(timeline.len() / 2);

    let mut start = center.saturating_sub(FOCUS_HALF);
    let end = (start + FOCUS_LEN).min(timeline.len());
    if end - start < FOCUS_LEN {
        start = end.saturating_sub(FOCUS_LEN);
    }
    &timeline[start..end]
}

/// Median of every metric value in `buckets`, rounded to one decimal.
fn median_metric(buckets: &[TimelineBucket]) -> Option<f64> {
    let mut values: Vec<OrderedFloat<f64>> = buckets
        .iter()
        .flat_map(|bucket| bucket.raw_metric_values.iter().copied())
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1].0 + values[mid].0) / 2.0
    } else {
        values[mid].0
    };
    Some(round1(median))
}

fn comparison_text(years: Option<&YearsInfo>) -> String {
    match years {
        Some(YearsInfo {
            n_years: Some(n), ..
        }) if *n > 0 => format!("{n} years"),
        Some(YearsInfo {
            range: Some(range), ..
        }) => range.clone(),
        _ => "Historical series".to_string(),
    }
}

/// Turns a successful payload into the view of `condition` for `target_date`.
///
/// Pure: the same inputs always produce the same view.
pub fn build_view(
    response: &QueryResponse,
    condition: Condition,
    target_date: NaiveDate,
    location_label: &str,
) -> ConditionView {
    let window_days = response.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let probability = response.probability_pct.filter(|value| value.is_finite());
    let logic = response.logic.unwrap_or_default();

    let buckets = DayOffsetAligner::new(target_date, window_days)
        .align(&response.timeseries, condition.metrics());
    let timeline_full: Vec<TimelineEntry> = buckets
        .iter()
        .map(|bucket| TimelineEntry::from_bucket(bucket, target_date))
        .collect();
    let timeline_focus = focus_window(&timeline_full).to_vec();

    let threshold_summary = describe_thresholds(
        condition,
        &response.thresholds_resolved,
        &response.units,
        logic,
    );

    let statistic = Statistic {
        value: response
            .stats
            .as_ref()
            .and_then(|stats| stats.p50)
            .filter(|value| value.is_finite())
            .or_else(|| median_metric(&buckets)),
        unit: statistic_unit(condition, &response.units),
    };

    let sample_days = response
        .sample
        .as_ref()
        .and_then(|sample| sample.n_days)
        .map_or_else(|| "--".to_string(), |days| days.to_string());
    let histogram = Histogram {
        values: timeline_focus
            .iter()
            .map(|entry| entry.probability_pct.unwrap_or(0.0))
            .collect(),
        labels: timeline_focus
            .iter()
            .map(|entry| entry.weekday_short.clone())
            .collect(),
        icons: timeline_focus
            .iter()
            .map(|entry| choose_icon(condition, entry.probability_pct))
            .collect(),
        description: format!("Window +/- {window_days} days. Sample {sample_days} days."),
        comparison: comparison_text(response.years.as_ref()),
    };

    let card = SummaryCard {
        location: location_label.to_string(),
        date_label: format_card_date(target_date),
        statistic,
        condition_label: condition.label().to_string(),
        probability,
        threshold_summary: threshold_summary.clone(),
        histogram,
    };

    let summary = ViewSummary {
        threshold: threshold_summary,
        datasets: response.dataset_used.clone(),
        sample: response.sample.clone(),
        window_days,
        years: response.years.clone(),
        notes: response.notes.clone(),
        logic: response.logic,
        probability,
        generated_at: response.generated_at.clone(),
        query_id: response.query_id.clone(),
    };

    ConditionView {
        card,
        timeline_full,
        timeline_focus,
        probability,
        summary,
    }
}
