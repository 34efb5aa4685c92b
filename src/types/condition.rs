//! Defines the `Condition` enum, the five "very ..." weather conditions the Cronoweath
//! service can compute historical odds for, together with the per-condition metadata
//! (display label, metrics used for the representative statistic, unit kind).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A weather condition whose historical probability can be queried.
///
/// The derived ordering follows the default display order used by the client
/// (hot, cold, windy, wet, muggy), which also makes `Condition` usable as an
/// ordered map key.
///
/// # Examples
///
/// ```
/// use cronoweath::Condition;
///
/// let wet: Condition = "wet".parse().unwrap();
/// assert_eq!(wet, Condition::Wet);
/// assert_eq!(wet.to_string(), "wet");
/// assert_eq!(wet.label(), "Very wet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Daily maximum temperature or heat index at or above the threshold.
    Hot,
    /// Daily minimum temperature or wind chill at or below the threshold.
    Cold,
    /// Maximum wind speed or gust at or above the threshold.
    Windy,
    /// Daily precipitation or precipitation rate at or above the threshold.
    Wet,
    /// Heat index or dew point at or above the threshold.
    Muggy,
}

/// The kind of physical quantity a condition is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    #[serde(rename = "temp")]
    Temperature,
    Wind,
    #[serde(rename = "precip")]
    Precipitation,
}

impl Condition {
    /// All conditions, in the default display and query order.
    pub const ALL: [Condition; 5] = [
        Condition::Hot,
        Condition::Cold,
        Condition::Windy,
        Condition::Wet,
        Condition::Muggy,
    ];

    /// The wire key used by the backend (`"hot"`, `"cold"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Condition::Hot => "hot",
            Condition::Cold => "cold",
            Condition::Windy => "windy",
            Condition::Wet => "wet",
            Condition::Muggy => "muggy",
        }
    }

    /// Human readable label shown on cards and tabs.
    pub fn label(self) -> &'static str {
        match self {
            Condition::Hot => "Very hot",
            Condition::Cold => "Very cold",
            Condition::Windy => "Very windy",
            Condition::Wet => "Very wet",
            Condition::Muggy => "Very muggy",
        }
    }

    /// Time series fields carrying this condition's representative metric, in order of
    /// preference. The first one present in a row is the one that counts.
    pub fn metrics(self) -> &'static [&'static str] {
        match self {
            Condition::Hot => &["t2m_max", "hi_max"],
            Condition::Cold => &["t2m_min", "wc_min"],
            Condition::Windy => &["wind_speed_max", "wind_gust_p95"],
            Condition::Wet => &["precip_daily", "precip_rate_max"],
            Condition::Muggy => &["hi_max", "dewpoint_max"],
        }
    }

    pub fn unit_kind(self) -> UnitKind {
        match self {
            Condition::Hot | Condition::Cold | Condition::Muggy => UnitKind::Temperature,
            Condition::Windy => UnitKind::Wind,
            Condition::Wet => UnitKind::Precipitation,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown weather condition '{0}'")]
pub struct ParseConditionError(pub String);

impl FromStr for Condition {
    type Err = ParseConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(Condition::Hot),
            "cold" => Ok(Condition::Cold),
            "windy" => Ok(Condition::Windy),
            "wet" => Ok(Condition::Wet),
            "muggy" => Ok(Condition::Muggy),
            _ => Err(ParseConditionError(s.to_string())),
        }
    }
}

/// How the two thresholds of a condition are combined by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Logic {
    /// Either threshold exceeded.
    #[default]
    #[serde(rename = "ANY", alias = "any")]
    Any,
    /// Both thresholds exceeded.
    #[serde(rename = "ALL", alias = "all")]
    All,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::Any => "ANY",
            Logic::All => "ALL",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_keys() {
        for condition in Condition::ALL {
            assert_eq!(condition.key().parse::<Condition>(), Ok(condition));
        }
        assert_eq!(" Windy ".parse::<Condition>(), Ok(Condition::Windy));
        assert_eq!(
            "stormy".parse::<Condition>(),
            Err(ParseConditionError("stormy".to_string()))
        );
    }

    #[test]
    fn test_order_matches_default_display_order() {
        let mut shuffled = vec![Condition::Muggy, Condition::Hot, Condition::Wet];
        shuffled.sort();
        assert_eq!(shuffled, [Condition::Hot, Condition::Wet, Condition::Muggy]);
    }

    #[test]
    fn test_serde_keys() {
        assert_eq!(serde_json::to_string(&Condition::Muggy).unwrap(), "\"muggy\"");
        assert_eq!(serde_json::to_string(&Logic::All).unwrap(), "\"ALL\"");
        let logic: Logic = serde_json::from_str("\"any\"").unwrap();
        assert_eq!(logic, Logic::Any);
    }
}
