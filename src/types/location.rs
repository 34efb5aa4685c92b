//! Geographic types: the coordinate pair used throughout the crate and the `Place`
//! returned by the geocoding service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use cronoweath::LatLon;
///
/// let lima = LatLon(-12.0464, -77.0428);
/// assert_eq!(lima.lat(), -12.0464);
/// assert_eq!(lima.to_string(), "-12.0464, -77.0428");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    /// Both components are finite and within the valid degree ranges.
    pub fn is_valid(self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.0, self.1)
    }
}

/// The `{lat, lon}` object the probability service expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<LatLon> for GeoPoint {
    fn from(value: LatLon) -> Self {
        GeoPoint {
            lat: value.0,
            lon: value.1,
        }
    }
}

/// A named location candidate, as returned by the geocoding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Display label, e.g. `"Arequipa, Arequipa, Peru"`.
    pub label: String,
    pub name: String,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub location: LatLon,
    /// IANA timezone name, if known.
    pub timezone: Option<String>,
    /// Elevation in meters, if known.
    pub elevation: Option<f64>,
}

impl Place {
    /// A place known only by its label and coordinates.
    pub fn new(label: impl Into<String>, location: LatLon) -> Self {
        let label = label.into();
        Self {
            name: label.clone(),
            label,
            admin1: None,
            admin2: None,
            country: None,
            country_code: None,
            location,
            timezone: None,
            elevation: None,
        }
    }

    /// Short descriptive chips for the place: coordinates, timezone, region and elevation.
    pub fn details(&self) -> Vec<String> {
        let mut details = vec![
            format!("Lat {}", format_coordinate(self.location.lat())),
            format!("Lon {}", format_coordinate(self.location.lon())),
        ];
        if let Some(timezone) = &self.timezone {
            details.push(format!("Timezone {timezone}"));
        }
        match (&self.admin1, &self.country) {
            (Some(admin1), Some(country)) => details.push(format!("{admin1}, {country}")),
            (None, Some(country)) => details.push(country.clone()),
            _ => {}
        }
        if let Some(elevation) = self.elevation {
            details.push(format!("Elevation {elevation} m"));
        }
        details
    }
}

fn format_coordinate(value: f64) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2} deg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_serializes_as_lat_lon_object() {
        let point = GeoPoint::from(LatLon(10.5, -66.9));
        assert_eq!(
            serde_json::to_value(point).unwrap(),
            serde_json::json!({"lat": 10.5, "lon": -66.9})
        );
    }

    #[test]
    fn test_validity() {
        assert!(LatLon(52.52, 13.40).is_valid());
        assert!(!LatLon(91.0, 0.0).is_valid());
        assert!(!LatLon(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_place_details() {
        let mut place = Place::new("Cusco", LatLon(-13.5319, -71.9675));
        place.country = Some("Peru".to_string());
        place.admin1 = Some("Cusco".to_string());
        place.elevation = Some(3399.0);

        assert_eq!(
            place.details(),
            [
                "Lat -13.53 deg",
                "Lon -71.97 deg",
                "Cusco, Peru",
                "Elevation 3399 m"
            ]
        );
    }
}
