use crate::service::error::ServiceError;
use crate::service::job_service::{JobPoll, JobService, JobTicket};
use crate::types::catalog::ConditionCatalog;
use crate::types::request::JobRequest;
use crate::types::response::{InsufficientSample, QueryResponse};
use crate::utils::trim_base_url;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const STATUS_INSUFFICIENT: &str = "insufficient_sample";
const STATUS_ERROR: &str = "error";

/// [`JobService`] backed by the probability service's REST API.
#[derive(Debug, Clone)]
pub struct HttpJobService {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SubmitBody {
    #[serde(default)]
    query_id: Option<String>,
}

/// The string `detail` field of an error body, if any.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}

fn status_error(url: &str, status: StatusCode, body: &[u8]) -> ServiceError {
    ServiceError::HttpStatus {
        url: url.to_string(),
        status,
        detail: error_detail(body),
    }
}

/// Interprets the answer to `POST /query_async`.
pub(crate) fn interpret_submit(
    url: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<JobTicket, ServiceError> {
    if !status.is_success() {
        return Err(status_error(url, status, body));
    }
    let parsed: SubmitBody = serde_json::from_slice(body)
        .map_err(|e| ServiceError::JsonParse(url.to_string(), e))?;
    match parsed.query_id {
        Some(query_id) if !query_id.trim().is_empty() => Ok(JobTicket { query_id }),
        _ => Err(ServiceError::MissingJobId(url.to_string())),
    }
}

/// Interprets the answer to `GET /result`.
pub(crate) fn interpret_poll(
    url: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<JobPoll, ServiceError> {
    if status == StatusCode::ACCEPTED {
        return Ok(JobPoll::Pending);
    }
    if !status.is_success() {
        return Err(status_error(url, status, body));
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ServiceError::JsonParse(url.to_string(), e))?;
    let parse_error = |e| ServiceError::JsonParse(url.to_string(), e);

    let job_status = value
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string);
    match job_status.as_deref() {
        Some(STATUS_INSUFFICIENT) => {
            let insufficient: InsufficientSample =
                serde_json::from_value(value).map_err(parse_error)?;
            Ok(JobPoll::Insufficient(insufficient))
        }
        Some(STATUS_ERROR) => {
            let message = value
                .get("message")
                .or_else(|| value.get("detail"))
                .and_then(Value::as_str)
                .unwrap_or("The service reported an error.")
                .to_string();
            Ok(JobPoll::Failed(message))
        }
        _ => {
            let response: QueryResponse = serde_json::from_value(value).map_err(parse_error)?;
            Ok(JobPoll::Ready(Box::new(response)))
        }
    }
}

impl HttpJobService {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ServiceError::ClientBuild)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base_url(&base_url.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body(url: &str, response: Response) -> Result<(StatusCode, Vec<u8>), ServiceError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::NetworkRequest(url.to_string(), e))?;
        Ok((status, body.to_vec()))
    }

    /// Fetches the condition configuration from `GET /conditions`.
    pub async fn fetch_catalog(&self) -> Result<ConditionCatalog, ServiceError> {
        let url = format!("{}/conditions", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkRequest(url.clone(), e))?;
        let (status, body) = Self::read_body(&url, response).await?;
        if !status.is_success() {
            return Err(status_error(&url, status, &body));
        }
        serde_json::from_slice(&body).map_err(|e| ServiceError::JsonParse(url, e))
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn submit(&self, request: &JobRequest) -> Result<JobTicket, ServiceError> {
        let url = format!("{}/query_async", self.base_url);
        info!(
            "Starting job for condition {} on {}",
            request.condition, request.target_day
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::NetworkRequest(url.clone(), e))?;
        let (status, body) = Self::read_body(&url, response).await?;
        interpret_submit(&url, status, &body)
    }

    async fn poll(&self, query_id: &str) -> Result<JobPoll, ServiceError> {
        let url = format!("{}/result", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query_id", query_id)])
            .send()
            .await
            .map_err(|e| ServiceError::NetworkRequest(url.clone(), e))?;
        let (status, body) = Self::read_body(&url, response).await?;
        debug!("Polled job {} with status {}", query_id, status);
        interpret_poll(&url, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "http://localhost/query_async";

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_submit_returns_ticket() {
        let ticket =
            interpret_submit(URL, StatusCode::OK, &body(json!({"query_id": "abc"}))).unwrap();
        assert_eq!(ticket.query_id, "abc");
    }

    #[test]
    fn test_submit_error_carries_detail() {
        let err = interpret_submit(
            URL,
            StatusCode::BAD_REQUEST,
            &body(json!({"detail": "Invalid target_day"})),
        )
        .unwrap_err();
        match err {
            ServiceError::HttpStatus { status, detail, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(detail.as_deref(), Some("Invalid target_day"));
            }
            other => panic!("unexpected error {other:?}"),
        }

        // Non-string details and non-JSON bodies are ignored.
        let err = interpret_submit(URL, StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert!(matches!(err, ServiceError::HttpStatus { detail: None, .. }));
        let err = interpret_submit(
            URL,
            StatusCode::UNPROCESSABLE_ENTITY,
            &body(json!({"detail": [{"msg": "field required"}]})),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::HttpStatus { detail: None, .. }));
    }

    #[test]
    fn test_submit_without_job_id() {
        let err = interpret_submit(URL, StatusCode::OK, &body(json!({}))).unwrap_err();
        assert!(matches!(err, ServiceError::MissingJobId(_)));
        let err = interpret_submit(URL, StatusCode::OK, &body(json!({"query_id": ""}))).unwrap_err();
        assert!(matches!(err, ServiceError::MissingJobId(_)));
        let err = interpret_submit(URL, StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ServiceError::JsonParse(..)));
    }

    #[test]
    fn test_poll_pending_and_errors() {
        assert_eq!(
            interpret_poll(URL, StatusCode::ACCEPTED, b"").unwrap(),
            JobPoll::Pending
        );
        let err = interpret_poll(URL, StatusCode::INTERNAL_SERVER_ERROR, b"").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::HttpStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        let err = interpret_poll(URL, StatusCode::OK, b"{").unwrap_err();
        assert!(matches!(err, ServiceError::JsonParse(..)));
    }

    #[test]
    fn test_poll_terminal_states() {
        let insufficient = interpret_poll(
            URL,
            StatusCode::OK,
            &body(json!({
                "status": "insufficient_sample",
                "message": "Only 12 days available",
                "sample": {"n_days": 12, "coverage_pct": 4.0},
            })),
        )
        .unwrap();
        match insufficient {
            JobPoll::Insufficient(payload) => {
                assert_eq!(payload.message.as_deref(), Some("Only 12 days available"));
                assert_eq!(payload.sample.and_then(|sample| sample.n_days), Some(12));
            }
            other => panic!("unexpected poll {other:?}"),
        }

        let failed = interpret_poll(
            URL,
            StatusCode::OK,
            &body(json!({"status": "error", "message": "Data engine error"})),
        )
        .unwrap();
        assert_eq!(failed, JobPoll::Failed("Data engine error".to_string()));

        let ready = interpret_poll(
            URL,
            StatusCode::OK,
            &body(json!({"query_id": "q1", "probability_pct": 41.5, "timeseries": []})),
        )
        .unwrap();
        match ready {
            JobPoll::Ready(response) => {
                assert_eq!(response.query_id.as_deref(), Some("q1"));
                assert_eq!(response.probability_pct, Some(41.5));
            }
            other => panic!("unexpected poll {other:?}"),
        }
    }

    #[test]
    fn test_poll_ready_with_malformed_rows() {
        let ready = interpret_poll(
            URL,
            StatusCode::OK,
            &body(json!({
                "query_id": "q1",
                "timeseries": [
                    {"date": "2001-03-01", "exceed": true},
                    {"date": 20010302, "exceed": true},
                    {"date": "2001-03-03", "exceed": "yes"},
                ],
            })),
        )
        .unwrap();
        let response = match ready {
            JobPoll::Ready(response) => response,
            other => panic!("unexpected poll {other:?}"),
        };
        let known: Vec<_> = response
            .timeseries
            .iter()
            .filter(|row| row.month_day().is_some() && row.exceed.is_some())
            .collect();
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].date.as_deref(), Some("2001-03-01"));
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let service = HttpJobService::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(service.base_url(), "http://localhost:8000");
    }
}
