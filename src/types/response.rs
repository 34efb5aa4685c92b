//! Payloads returned by the probability service once a job reaches a terminal state.
//!
//! Everything here is decoded leniently: optional fields may be missing or `null`, and
//! time series rows keep any numeric column as a metric value.

use crate::types::condition::{Logic, UnitKind};
use crate::types::request::YearsMode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const DEFAULT_TEMPERATURE_UNIT: &str = "degC";
const DEFAULT_WIND_UNIT: &str = "km/h";
const DEFAULT_PRECIPITATION_UNIT: &str = "mm";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One day of the historical time series attached to a result.
///
/// The year in `date` is whatever historical year the row was sampled from; only the
/// month and day are meaningful to the client.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawDaySample")]
pub struct DaySample {
    /// `"YYYY-MM-DD"` as sent by the backend.
    pub date: Option<String>,
    /// `Some(true)` when the day exceeded the thresholds, `None` when it could not be evaluated.
    pub exceed: Option<bool>,
    /// Every numeric column of the row, `None` for explicit nulls.
    pub metric_values: BTreeMap<String, Option<f64>>,
}

/// Rows are decoded field by field so that one malformed row never fails the response.
#[derive(Deserialize)]
struct RawDaySample {
    #[serde(default)]
    date: Value,
    #[serde(default)]
    exceed: Value,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<RawDaySample> for DaySample {
    fn from(raw: RawDaySample) -> Self {
        let metric_values = raw
            .fields
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => Some((name, None)),
                Value::Number(number) => Some((name, number.as_f64())),
                _ => None,
            })
            .collect();
        let date = match raw.date {
            Value::String(date) => Some(date),
            _ => None,
        };
        DaySample {
            date,
            exceed: raw.exceed.as_bool(),
            metric_values,
        }
    }
}

impl DaySample {
    pub fn new(date: impl Into<String>, exceed: Option<bool>) -> Self {
        Self {
            date: Some(date.into()),
            exceed,
            metric_values: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.metric_values.insert(name.into(), value);
        self
    }

    /// The value of a metric column, if present, non-null and finite.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metric_values
            .get(name)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }

    /// Month (1-12) and day of the row's date, ignoring its year.
    ///
    /// Returns `None` when the date is missing or does not have at least three
    /// `-`-separated numeric parts.
    pub fn month_day(&self) -> Option<(u32, u32)> {
        let date = self.date.as_deref()?;
        let mut parts = date.trim().split('-');
        let _year = parts.next()?;
        let month = parts.next()?.trim().parse::<u32>().ok()?;
        let day = parts.next()?.trim().parse::<u32>().ok()?;
        Some((month, day))
    }
}

/// Unit labels the backend used for the values of a response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitLabels {
    #[serde(default)]
    pub temp: Option<String>,
    #[serde(default)]
    pub precip: Option<String>,
    #[serde(default)]
    pub wind: Option<String>,
}

impl UnitLabels {
    /// The label for a unit kind, falling back to SI labels.
    pub fn unit_for(&self, kind: UnitKind) -> &str {
        match kind {
            UnitKind::Temperature => self.temp.as_deref().unwrap_or(DEFAULT_TEMPERATURE_UNIT),
            UnitKind::Wind => self.wind.as_deref().unwrap_or(DEFAULT_WIND_UNIT),
            UnitKind::Precipitation => self
                .precip
                .as_deref()
                .unwrap_or(DEFAULT_PRECIPITATION_UNIT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleInfo {
    #[serde(default)]
    pub n_days: Option<u32>,
    #[serde(default)]
    pub coverage_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearsInfo {
    #[serde(default)]
    pub mode: Option<YearsMode>,
    /// e.g. `"2005-2024"`.
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub n_years: Option<u32>,
}

/// Percentiles of the condition's metric over the whole sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub p10: Option<f64>,
    #[serde(default)]
    pub p50: Option<f64>,
    #[serde(default)]
    pub p90: Option<f64>,
}

/// A successful terminal payload for one condition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QueryResponse {
    /// Echo of the job identifier. A terminal payload without it is malformed.
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub logic: Option<Logic>,
    #[serde(default)]
    pub target_day: Option<String>,
    #[serde(default)]
    pub window_days: Option<u32>,
    #[serde(default)]
    pub years: Option<YearsInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thresholds_resolved: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub probability_pct: Option<f64>,
    #[serde(default)]
    pub stats: Option<SummaryStats>,
    #[serde(default)]
    pub sample: Option<SampleInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dataset_used: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: UnitLabels,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeseries: Vec<DaySample>,
}

/// Terminal payload signalling the backend did not have enough historical days.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsufficientSample {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sample: Option<SampleInfo>,
}
