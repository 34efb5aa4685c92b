use crate::types::condition::Condition;
use serde::{Deserialize, Serialize};

/// Weather glyph shown above each histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Sunny,
    Clear,
    Cloudy,
    Showers,
    Rainy,
    Windy,
    Night,
}

/// Picks the glyph for a day given the condition and that day's probability.
pub fn choose_icon(condition: Condition, probability: Option<f64>) -> Icon {
    let Some(probability) = probability else {
        return Icon::Cloudy;
    };
    match condition {
        Condition::Wet if probability >= 70.0 => Icon::Rainy,
        Condition::Wet if probability >= 40.0 => Icon::Showers,
        Condition::Wet => Icon::Cloudy,
        Condition::Windy if probability >= 40.0 => Icon::Windy,
        Condition::Windy => Icon::Clear,
        Condition::Cold if probability >= 60.0 => Icon::Night,
        Condition::Cold if probability >= 30.0 => Icon::Cloudy,
        Condition::Cold => Icon::Clear,
        Condition::Muggy if probability >= 60.0 => Icon::Cloudy,
        Condition::Muggy if probability >= 30.0 => Icon::Clear,
        Condition::Muggy => Icon::Sunny,
        Condition::Hot if probability >= 50.0 => Icon::Sunny,
        Condition::Hot => Icon::Clear,
    }
}
