//! Place search through the Open-Meteo geocoding API, and a debounced suggester for
//! search-as-you-type inputs.

use crate::service::error::ServiceError;
use crate::types::location::{LatLon, Place};
use async_trait::async_trait;
use bon::bon;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_RESULT_COUNT: u32 = 6;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);
/// Shorter queries never reach the geocoder.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    admin2: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    elevation: Option<f64>,
}

impl From<GeocodingResult> for Place {
    fn from(result: GeocodingResult) -> Self {
        let mut label = result.name.clone();
        for part in [&result.admin1, &result.country].into_iter().flatten() {
            label.push_str(", ");
            label.push_str(part);
        }
        Place {
            label,
            name: result.name,
            admin1: result.admin1,
            admin2: result.admin2,
            country: result.country,
            country_code: result.country_code,
            location: LatLon(result.latitude, result.longitude),
            timezone: result.timezone,
            elevation: result.elevation,
        }
    }
}

/// Decodes a geocoding answer. A body without `results` means no match.
pub(crate) fn parse_places(body: &[u8]) -> Result<Vec<Place>, serde_json::Error> {
    let response: GeocodingResponse = serde_json::from_slice(body)?;
    Ok(response
        .results
        .unwrap_or_default()
        .into_iter()
        .map(Place::from)
        .collect())
}

/// Resolves free text into candidate places.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Place>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: Client,
    url: String,
    count: u32,
    language: String,
}

impl Default for OpenMeteoGeocoder {
    fn default() -> Self {
        Self::new(Client::new(), DEFAULT_GEOCODING_URL)
    }
}

#[bon]
impl OpenMeteoGeocoder {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            count: DEFAULT_RESULT_COUNT,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Sets the result count and language used by [`Geocoder::search`].
    pub fn with_defaults(mut self, count: u32, language: impl Into<String>) -> Self {
        self.count = count;
        self.language = language.into();
        self
    }

    /// Searches places by name, overriding the result count or language for this call.
    ///
    /// # Arguments
    ///
    /// * `.name(&str)`: **Required.** Free text, e.g. `"Arequipa"`.
    /// * `.count(u32)`: Optional. Maximum number of candidates.
    /// * `.language(&str)`: Optional. Language of the returned names.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use cronoweath::OpenMeteoGeocoder;
    /// # async fn run() -> Result<(), cronoweath::ServiceError> {
    /// let geocoder = OpenMeteoGeocoder::default();
    /// let places = geocoder.search_with().name("Cusco").count(3).call().await?;
    /// assert!(places.len() <= 3);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn search_with(
        &self,
        name: &str,
        count: Option<u32>,
        language: Option<&str>,
    ) -> Result<Vec<Place>, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        let count = count.unwrap_or(self.count).to_string();
        let language = language.unwrap_or(&self.language);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("name", name),
                ("count", count.as_str()),
                ("language", language),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::NetworkRequest(self.url.clone(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::HttpStatus {
                url: self.url.clone(),
                status,
                detail: None,
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::NetworkRequest(self.url.clone(), e))?;
        let places =
            parse_places(&body).map_err(|e| ServiceError::JsonParse(self.url.clone(), e))?;
        debug!("Geocoded '{}' to {} places", name, places.len());
        Ok(places)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, ServiceError> {
        self.search_with().name(query).call().await
    }
}

/// Debounced search-as-you-type on top of a [`Geocoder`].
///
/// Every call supersedes the previous one: a superseded call resolves to `Ok(None)`
/// without waiting for its request.
pub struct PlaceSuggester<G> {
    geocoder: Arc<G>,
    debounce: Duration,
    current: Mutex<CancellationToken>,
}

impl<G: Geocoder> PlaceSuggester<G> {
    pub fn new(geocoder: Arc<G>, debounce: Duration) -> Self {
        Self {
            geocoder,
            debounce,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    fn supersede(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    /// Cancels the in-flight suggestion, if any.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Suggestions for `query`, or `None` when a later call superseded this one.
    pub async fn suggest(&self, query: &str) -> Result<Option<Vec<Place>>, ServiceError> {
        let token = self.supersede();
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Some(Vec::new()));
        }

        tokio::select! {
            _ = token.cancelled() => return Ok(None),
            _ = tokio::time::sleep(self.debounce) => {}
        }
        tokio::select! {
            _ = token.cancelled() => Ok(None),
            result = self.geocoder.search(query) => result.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_parse_places() {
        let body = br#"{
            "results": [
                {"id": 3946083, "name": "Cusco", "latitude": -13.52264, "longitude": -71.96734,
                 "elevation": 3399.0, "country_code": "PE", "admin1": "Cusco", "admin2": "Provincia de Cusco",
                 "timezone": "America/Lima", "country": "Peru"},
                {"name": "Cusco Mountain", "latitude": 1.0, "longitude": 2.0}
            ],
            "generationtime_ms": 0.5
        }"#;
        let places = parse_places(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].label, "Cusco, Cusco, Peru");
        assert_eq!(places[0].country_code.as_deref(), Some("PE"));
        assert_eq!(places[0].location, LatLon(-13.52264, -71.96734));
        assert_eq!(places[1].label, "Cusco Mountain");
        assert_eq!(places[1].timezone, None);
    }

    #[test]
    fn test_parse_places_without_results() {
        assert!(parse_places(br#"{"generationtime_ms": 0.1}"#).unwrap().is_empty());
    }

    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
        last_query: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn search(&self, query: &str) -> Result<Vec<Place>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.to_string());
            Ok(vec![Place::new(query, LatLon(0.0, 0.0))])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_skips_request() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let suggester = PlaceSuggester::new(geocoder.clone(), DEFAULT_DEBOUNCE);
        assert_eq!(suggester.suggest("  li ").await.unwrap(), Some(Vec::new()));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_query_supersedes_earlier() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let suggester = PlaceSuggester::new(geocoder.clone(), DEFAULT_DEBOUNCE);

        let first = suggester.suggest("Lim");
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            suggester.suggest(" Lima ").await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), None);
        let places = second.unwrap().unwrap();
        assert_eq!(places[0].label, "Lima");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.last_query.lock().unwrap().as_deref(), Some("Lima"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_search() {
        let places = OpenMeteoGeocoder::default()
            .search_with()
            .name("Arequipa")
            .count(3)
            .call()
            .await
            .unwrap();
        assert!(!places.is_empty());
        assert!(places.len() <= 3);
    }
}
