//! Presentation model of one computed condition: the summary card, its histogram and
//! the timeline around the target date.

pub mod builder;
pub mod icon;
pub mod thresholds;

use crate::timeline::entry::TimelineEntry;
use crate::types::condition::Logic;
use crate::types::response::{SampleInfo, YearsInfo};
use crate::view::icon::Icon;
use serde::Serialize;

/// Everything needed to render one condition's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionView {
    pub card: SummaryCard,
    /// Every offset with at least one historical day, sorted by offset.
    pub timeline_full: Vec<TimelineEntry>,
    /// At most seven entries around the target date.
    pub timeline_focus: Vec<TimelineEntry>,
    pub probability: Option<f64>,
    pub summary: ViewSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub location: String,
    /// `"Wed 05 Mar 2025"`.
    pub date_label: String,
    pub statistic: Statistic,
    pub condition_label: String,
    pub probability: Option<f64>,
    pub threshold_summary: String,
    pub histogram: Histogram,
}

/// The representative value of the condition's metric (median over the sample).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    pub value: Option<f64>,
    pub unit: String,
}

/// Bars for the focus window. `values`, `labels` and `icons` have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Focus probabilities, unknown ones as `0.0`.
    pub values: Vec<f64>,
    /// Upper-case weekday abbreviations.
    pub labels: Vec<String>,
    pub icons: Vec<Icon>,
    /// `"Window +/- 15 days. Sample 620 days."`.
    pub description: String,
    /// `"20 years"`, the years range, or `"Historical series"`.
    pub comparison: String,
}

/// Details shown below the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub threshold: String,
    pub datasets: Vec<String>,
    pub sample: Option<SampleInfo>,
    pub window_days: u32,
    pub years: Option<YearsInfo>,
    pub notes: Vec<String>,
    pub logic: Option<Logic>,
    pub probability: Option<f64>,
    pub generated_at: Option<String>,
    pub query_id: Option<String>,
}
