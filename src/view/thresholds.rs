use crate::types::condition::{Condition, Logic};
use crate::types::response::UnitLabels;
use std::collections::BTreeMap;

pub const DEFAULT_THRESHOLDS_TEXT: &str = "Uses default thresholds";

type ThresholdPart = (&'static str, &'static str, &'static str, &'static str);

/// `(threshold name, symbol, comparison, unit suffix)` for each threshold a condition
/// understands, in display order.
fn threshold_parts(condition: Condition) -> [ThresholdPart; 2] {
    match condition {
        Condition::Hot => [("T_min", "T", ">=", ""), ("HI_min", "HI", ">=", "")],
        Condition::Cold => [("T_max", "T", "<=", ""), ("WC_max", "WC", "<=", "")],
        Condition::Windy => [("V_min", "V", ">=", ""), ("gust_min", "G", ">=", "")],
        Condition::Wet => [("P_daily", "P", ">=", ""), ("P_rate", "I", ">=", "/h")],
        Condition::Muggy => [("HI_min", "HI", ">=", ""), ("Td_min", "Td", ">=", "")],
    }
}

/// Human readable summary of the thresholds the backend applied.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cronoweath::{describe_thresholds, Condition, Logic, UnitLabels};
///
/// let thresholds = BTreeMap::from([
///     ("P_daily".to_string(), Some(10.0)),
///     ("P_rate".to_string(), Some(2.5)),
/// ]);
/// assert_eq!(
///     describe_thresholds(Condition::Wet, &thresholds, &UnitLabels::default(), Logic::Any),
///     "P >= 10 mm or I >= 2.5 mm/h"
/// );
/// ```
pub fn describe_thresholds(
    condition: Condition,
    thresholds: &BTreeMap<String, Option<f64>>,
    units: &UnitLabels,
    logic: Logic,
) -> String {
    let unit = units.unit_for(condition.unit_kind());
    let parts: Vec<String> = threshold_parts(condition)
        .iter()
        .filter_map(|(name, symbol, comparison, suffix)| {
            let value = thresholds
                .get(*name)
                .copied()
                .flatten()
                .filter(|value| value.is_finite())?;
            Some(format!("{symbol} {comparison} {value} {unit}{suffix}"))
        })
        .collect();

    if parts.is_empty() {
        return DEFAULT_THRESHOLDS_TEXT.to_string();
    }
    let joiner = match logic {
        Logic::All => " and ",
        Logic::Any => " or ",
    };
    parts.join(joiner)
}

/// Unit shown next to the representative statistic of `condition`.
pub(crate) fn statistic_unit(condition: Condition, units: &UnitLabels) -> String {
    units.unit_for(condition.unit_kind()).to_string()
}
