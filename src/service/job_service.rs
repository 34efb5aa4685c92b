use crate::service::error::ServiceError;
use crate::types::request::JobRequest;
use crate::types::response::{InsufficientSample, QueryResponse};
use async_trait::async_trait;

/// Identifier of a started job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTicket {
    pub query_id: String,
}

/// The state of a job as answered by one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPoll {
    /// Still computing; poll again later.
    Pending,
    Ready(Box<QueryResponse>),
    /// Not enough historical days to compute a probability.
    Insufficient(InsufficientSample),
    /// The job reached a terminal error state.
    Failed(String),
}

/// The asynchronous job API of the probability service.
///
/// Implemented over HTTP by [`HttpJobService`](crate::service::http::HttpJobService);
/// tests substitute an in-memory implementation.
#[async_trait]
pub trait JobService: Send + Sync {
    async fn submit(&self, request: &JobRequest) -> Result<JobTicket, ServiceError>;
    async fn poll(&self, query_id: &str) -> Result<JobPoll, ServiceError>;
}
