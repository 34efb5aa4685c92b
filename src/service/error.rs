use crate::types::condition::Condition;
use thiserror::Error;

pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from the service.";
pub const MISSING_JOB_ID_MESSAGE: &str = "The service did not return a job identifier.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        /// The `detail` message of the error body, when the service sent one.
        detail: Option<String>,
    },

    #[error("No job identifier in the response from {0}")]
    MissingJobId(String),

    #[error("Failed to parse JSON data from {0}")]
    JsonParse(String, #[source] serde_json::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// Which half of a job a transport failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Start,
    Fetch,
}

impl JobStage {
    fn verb(self) -> &'static str {
        match self {
            JobStage::Start => "starting",
            JobStage::Fetch => "fetching",
        }
    }
}

impl ServiceError {
    /// The message stored in a failed condition result.
    pub fn user_message(&self, stage: JobStage, condition: Condition) -> String {
        match self {
            ServiceError::HttpStatus {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ServiceError::HttpStatus { status, .. } => format!(
                "Error {} while {} condition {}",
                status.as_u16(),
                stage.verb(),
                condition
            ),
            ServiceError::MissingJobId(_) => MISSING_JOB_ID_MESSAGE.to_string(),
            ServiceError::JsonParse(..) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
            ServiceError::NetworkRequest(..) | ServiceError::ClientBuild(_) => format!(
                "Could not reach the service while {} condition {}",
                stage.verb(),
                condition
            ),
        }
    }
}
