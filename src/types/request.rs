//! The job-start payload sent to the probability service.

use crate::types::catalog::ConditionCatalog;
use crate::types::condition::{Condition, Logic};
use crate::types::location::{GeoPoint, Place};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which historical years the backend samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YearsMode {
    /// The last N complete years.
    #[default]
    #[serde(rename = "lastN")]
    LastN,
    /// Every year the dataset covers.
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    #[serde(rename = "SI")]
    Si,
    Imperial,
}

/// Body of `POST /query_async`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRequest {
    pub location: GeoPoint,
    /// `"YYYY-MM-DD"`.
    pub target_day: String,
    pub condition: Condition,
    pub logic: Logic,
    pub units: UnitSystem,
    /// Threshold overrides; omitted entirely when not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<BTreeMap<String, Option<f64>>>,
    pub window_days: u32,
    pub years_mode: YearsMode,
    #[serde(rename = "lastN_years")]
    pub last_n_years: u32,
    pub include_timeseries: bool,
}

impl JobRequest {
    /// Builds the request for one condition, taking logic, thresholds and sampling
    /// policy from the catalog.
    pub fn new(
        place: &Place,
        target_date: NaiveDate,
        condition: Condition,
        catalog: &ConditionCatalog,
    ) -> Self {
        Self {
            location: place.location.into(),
            target_day: target_date.format("%Y-%m-%d").to_string(),
            condition,
            logic: catalog.logic_for(condition),
            units: UnitSystem::Si,
            thresholds: catalog.thresholds_for(condition).cloned(),
            window_days: catalog.window_days(),
            years_mode: catalog.years_mode(),
            last_n_years: catalog.last_n_years(),
            include_timeseries: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::catalog::ConditionSettings;
    use crate::types::location::LatLon;
    use serde_json::json;

    fn quito() -> Place {
        Place::new("Quito, Pichincha, Ecuador", LatLon(-0.2299, -78.525))
    }

    #[test]
    fn test_default_catalog_request_omits_thresholds() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let request = JobRequest::new(&quito(), date, Condition::Hot, &ConditionCatalog::default());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "location": {"lat": -0.2299, "lon": -78.525},
                "target_day": "2025-03-07",
                "condition": "hot",
                "logic": "ANY",
                "units": "SI",
                "window_days": 15,
                "years_mode": "lastN",
                "lastN_years": 20,
                "include_timeseries": true,
            })
        );
    }

    #[test]
    fn test_request_carries_configured_thresholds() {
        let mut catalog = ConditionCatalog::default();
        catalog.window_days = Some(10);
        catalog.conditions.insert(
            "wet".to_string(),
            ConditionSettings {
                label: None,
                logic: Some(Logic::All),
                thresholds: Some(BTreeMap::from([
                    ("P_daily".to_string(), Some(20.0)),
                    ("P_rate".to_string(), None),
                ])),
            },
        );

        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let request = JobRequest::new(&quito(), date, Condition::Wet, &catalog);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["logic"], "ALL");
        assert_eq!(value["window_days"], 10);
        assert_eq!(value["thresholds"], json!({"P_daily": 20.0, "P_rate": null}));
    }
}
