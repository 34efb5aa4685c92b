//! This module provides the main entry point of the crate: a client bundling the
//! probability service, the geocoder and the configuration they share.

use crate::config::ClientConfig;
use crate::error::CronoweathError;
use crate::orchestrator::query::QueryOrchestrator;
use crate::orchestrator::result::RunReport;
use crate::service::error::ServiceError;
use crate::service::geocoding::{OpenMeteoGeocoder, PlaceSuggester};
use crate::service::http::HttpJobService;
use crate::types::catalog::ConditionCatalog;
use crate::types::condition::Condition;
use crate::types::location::Place;
use bon::bon;
use chrono::NaiveDate;
use log::warn;
use reqwest::Client;
use std::sync::Arc;

/// The main client for querying historical weather odds.
///
/// Create an instance using [`Cronoweath::new()`] to pick up the configuration file and
/// environment, or [`Cronoweath::with_config()`] to pass a configuration explicitly.
///
/// # Examples
///
/// ```rust,no_run
/// # use cronoweath::{Cronoweath, CronoweathError};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), CronoweathError> {
/// let client = Cronoweath::new()?;
///
/// let places = client.search_places().query("Arequipa").call().await?;
/// let report = client
///     .condition_odds()
///     .location(places[0].clone())
///     .date(NaiveDate::from_ymd_opt(2025, 12, 24).unwrap())
///     .call()
///     .await?;
/// for (condition, result) in &report.results {
///     println!("{}: {:?}", condition.label(), result.probability());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Cronoweath {
    config: ClientConfig,
    jobs: HttpJobService,
    geocoder: Arc<OpenMeteoGeocoder>,
}

#[bon]
impl Cronoweath {
    /// Creates a client from the default configuration file (if present) and the
    /// `CRONOWEATH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CronoweathError::Config`] when the configuration cannot be read or holds
    /// invalid values, and [`CronoweathError::Service`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, CronoweathError> {
        let config = ClientConfig::load(None)?;
        Self::with_config(config)
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, CronoweathError> {
        let config = config.validated()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ServiceError::ClientBuild)?;
        let jobs = HttpJobService::with_client(client.clone(), config.api_base_url.as_str());
        let geocoder = OpenMeteoGeocoder::new(client, config.geocoding_url.as_str())
            .with_defaults(config.geocode_count, config.language.as_str());
        Ok(Self {
            config,
            jobs,
            geocoder: Arc::new(geocoder),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Finds candidate places for free text.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.query(&str)`: **Required.** Place name, e.g. `"Cusco"`.
    /// * `.count(u32)`: Optional. Maximum number of candidates. Defaults to the configured count (6).
    /// * `.language(&str)`: Optional. Language of the names. Defaults to the configured language.
    #[builder]
    pub async fn search_places(
        &self,
        query: &str,
        count: Option<u32>,
        language: Option<&str>,
    ) -> Result<Vec<Place>, CronoweathError> {
        Ok(self
            .geocoder
            .search_with()
            .name(query)
            .maybe_count(count)
            .maybe_language(language)
            .call()
            .await?)
    }

    /// A debounced search-as-you-type helper sharing this client's geocoder.
    pub fn suggester(&self) -> PlaceSuggester<OpenMeteoGeocoder> {
        PlaceSuggester::new(self.geocoder.clone(), self.config.geocode_debounce)
    }

    /// The service's condition configuration, or the built-in default when it cannot be
    /// fetched.
    pub async fn condition_catalog(&self) -> ConditionCatalog {
        match self.jobs.fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Using default condition configuration: {}", e);
                ConditionCatalog::default()
            }
        }
    }

    /// A new orchestrator over this client's probability service.
    pub fn orchestrator(&self) -> QueryOrchestrator<HttpJobService> {
        QueryOrchestrator::new(self.jobs.clone(), self.config.poll_settings())
    }

    /// Computes the odds of every condition for one place and date in a single call.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(Place)`: **Required.** Where to query, typically from [`Cronoweath::search_places`].
    /// * `.date(NaiveDate)`: **Required.** The day of interest.
    /// * `.conditions(Vec<Condition>)`: Optional. Defaults to every condition of the service's configuration.
    ///
    /// # Errors
    ///
    /// Only input validation fails the call; failures of single conditions are part of
    /// the returned [`RunReport`].
    #[builder]
    pub async fn condition_odds(
        &self,
        location: Place,
        date: NaiveDate,
        conditions: Option<Vec<Condition>>,
    ) -> Result<RunReport, CronoweathError> {
        let catalog = self.condition_catalog().await;
        let conditions = conditions.unwrap_or_else(|| catalog.conditions());
        let report = self
            .orchestrator()
            .run()
            .location(location)
            .target_date(date)
            .conditions(conditions)
            .catalog(catalog)
            .call()
            .await?;
        Ok(report)
    }
}
