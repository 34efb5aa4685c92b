//! The condition configuration published by the service's `/conditions` endpoint, and
//! the hardcoded default used whenever that endpoint cannot be reached.

use crate::types::condition::{Condition, Logic};
use crate::types::request::YearsMode;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_WINDOW_DAYS: u32 = 15;
pub const DEFAULT_LAST_N_YEARS: u32 = 20;

/// Per-condition configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionSettings {
    #[serde(default)]
    pub label: Option<String>,
    /// Named thresholds, e.g. `{"T_min": 32.0, "HI_min": null}`.
    #[serde(default)]
    pub thresholds: Option<BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub logic: Option<Logic>,
}

/// Supported conditions and the sampling policy to query them with.
///
/// Every accessor falls back to the client defaults (window of 15 days, last 20 years,
/// `ANY` logic, backend default thresholds) when a value is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionCatalog {
    #[serde(default)]
    pub window_days: Option<u32>,
    #[serde(default)]
    pub years_mode: Option<YearsMode>,
    #[serde(default, rename = "lastN_years")]
    pub last_n_years: Option<u32>,
    #[serde(default)]
    pub min_sample_size: Option<u32>,
    /// Keyed by the wire condition key.
    #[serde(default)]
    pub conditions: BTreeMap<String, ConditionSettings>,
}

impl Default for ConditionCatalog {
    fn default() -> Self {
        let conditions = Condition::ALL
            .iter()
            .map(|condition| {
                (
                    condition.key().to_string(),
                    ConditionSettings {
                        label: Some(condition.label().to_string()),
                        ..ConditionSettings::default()
                    },
                )
            })
            .collect();
        Self {
            window_days: Some(DEFAULT_WINDOW_DAYS),
            years_mode: Some(YearsMode::LastN),
            last_n_years: Some(DEFAULT_LAST_N_YEARS),
            min_sample_size: None,
            conditions,
        }
    }
}

impl ConditionCatalog {
    pub fn window_days(&self) -> u32 {
        self.window_days.unwrap_or(DEFAULT_WINDOW_DAYS)
    }

    pub fn years_mode(&self) -> YearsMode {
        self.years_mode.unwrap_or_default()
    }

    pub fn last_n_years(&self) -> u32 {
        self.last_n_years.unwrap_or(DEFAULT_LAST_N_YEARS)
    }

    pub fn settings(&self, condition: Condition) -> Option<&ConditionSettings> {
        self.conditions.get(condition.key())
    }

    pub fn logic_for(&self, condition: Condition) -> Logic {
        self.settings(condition)
            .and_then(|settings| settings.logic)
            .unwrap_or_default()
    }

    pub fn thresholds_for(&self, condition: Condition) -> Option<&BTreeMap<String, Option<f64>>> {
        self.settings(condition)
            .and_then(|settings| settings.thresholds.as_ref())
    }

    pub fn label_for(&self, condition: Condition) -> String {
        self.settings(condition)
            .and_then(|settings| settings.label.clone())
            .unwrap_or_else(|| condition.label().to_string())
    }

    /// Conditions to query, in display order, with their labels.
    ///
    /// The default five always come first; configuration keys the client does not know
    /// how to query are skipped with a warning.
    pub fn condition_list(&self) -> Vec<(Condition, String)> {
        for key in self.conditions.keys() {
            if key.parse::<Condition>().is_err() {
                warn!("Ignoring unsupported condition '{}' from configuration", key);
            }
        }
        Condition::ALL
            .iter()
            .map(|condition| (*condition, self.label_for(*condition)))
            .collect()
    }

    pub fn conditions(&self) -> Vec<Condition> {
        self.condition_list()
            .into_iter()
            .map(|(condition, _)| condition)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_service_configuration() {
        let catalog: ConditionCatalog = serde_json::from_value(json!({
            "window_days": 7,
            "years_mode": "all",
            "lastN_years": null,
            "min_sample_size": 300,
            "units_ui": "toggle",
            "conditions": {
                "hot": {"label": "Scorching", "thresholds": {"T_min": 32, "HI_min": null}, "logic": "ANY"},
                "cold": {"logic": "ALL", "unit": "degC"},
            },
        }))
        .unwrap();

        assert_eq!(catalog.window_days(), 7);
        assert_eq!(catalog.years_mode(), YearsMode::All);
        assert_eq!(catalog.last_n_years(), DEFAULT_LAST_N_YEARS);
        assert_eq!(catalog.label_for(Condition::Hot), "Scorching");
        assert_eq!(catalog.label_for(Condition::Wet), "Very wet");
        assert_eq!(catalog.logic_for(Condition::Cold), Logic::All);
        assert_eq!(catalog.logic_for(Condition::Windy), Logic::Any);
        assert_eq!(
            catalog.thresholds_for(Condition::Hot).unwrap().get("T_min"),
            Some(&Some(32.0))
        );
    }

    #[test]
    fn test_condition_list_keeps_default_order() {
        let mut catalog = ConditionCatalog::default();
        catalog
            .conditions
            .insert("dusty".to_string(), ConditionSettings::default());

        assert_eq!(catalog.conditions(), Condition::ALL.to_vec());
        assert_eq!(
            catalog.condition_list()[1],
            (Condition::Cold, "Very cold".to_string())
        );
    }
}
