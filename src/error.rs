use crate::config::ConfigError;
use crate::orchestrator::error::QueryError;
use crate::service::error::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CronoweathError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
