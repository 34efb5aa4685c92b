mod calendar;
mod config;
mod cronoweath;
mod error;
mod orchestrator;
mod service;
mod timeline;
mod types;
mod utils;
mod view;

pub use cronoweath::*;
pub use error::CronoweathError;

pub use config::{ClientConfig, ConfigError};

pub use calendar::cursor::CalendarCursor;
pub use calendar::grid::{build_calendar, build_calendar_starting, weekday_headers, CalendarCell, Week};
pub use calendar::{format_card_date, format_long_date};

pub use types::catalog::{ConditionCatalog, ConditionSettings};
pub use types::condition::{Condition, Logic, ParseConditionError, UnitKind};
pub use types::location::{GeoPoint, LatLon, Place};
pub use types::request::{JobRequest, UnitSystem, YearsMode};
pub use types::response::{
    DaySample, InsufficientSample, QueryResponse, SampleInfo, SummaryStats, UnitLabels, YearsInfo,
};

pub use timeline::aligner::{DayOffsetAligner, REFERENCE_YEAR};
pub use timeline::bucket::TimelineBucket;
pub use timeline::build_timeline;
pub use timeline::entry::TimelineEntry;

pub use view::builder::{build_view, focus_window};
pub use view::icon::{choose_icon, Icon};
pub use view::thresholds::describe_thresholds;
pub use view::{ConditionView, Histogram, Statistic, SummaryCard, ViewSummary};

pub use service::error::{JobStage, ServiceError};
pub use service::geocoding::{Geocoder, OpenMeteoGeocoder, PlaceSuggester};
pub use service::http::HttpJobService;
pub use service::job_service::{JobPoll, JobService, JobTicket};

pub use orchestrator::error::{QueryError, ValidationError};
pub use orchestrator::query::QueryOrchestrator;
pub use orchestrator::result::{ConditionQueryResult, ResultsSnapshot, RunReport};
pub use orchestrator::settings::PollSettings;
