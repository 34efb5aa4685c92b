use crate::types::condition::Condition;
use crate::types::response::InsufficientSample;
use crate::view::ConditionView;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final state of one condition within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConditionQueryResult {
    Ok(Box<ConditionView>),
    /// The backend did not have enough historical days.
    Insufficient(InsufficientSample),
    Error { message: String },
    /// The run was cancelled while this condition was in flight.
    Aborted,
}

impl ConditionQueryResult {
    pub fn error(message: impl Into<String>) -> Self {
        ConditionQueryResult::Error {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ConditionQueryResult::Ok(_))
    }

    pub fn view(&self) -> Option<&ConditionView> {
        match self {
            ConditionQueryResult::Ok(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    /// Overall probability, only known for computed conditions.
    pub fn probability(&self) -> Option<f64> {
        self.view().and_then(|view| view.probability)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ConditionQueryResult::Error { message } => Some(message),
            ConditionQueryResult::Insufficient(payload) => payload.message.as_deref(),
            _ => None,
        }
    }
}

/// What observers of an orchestrator see: the results published so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultsSnapshot {
    /// Run that produced this snapshot. Bumped by every run and reset.
    pub generation: u64,
    pub results: BTreeMap<Condition, ConditionQueryResult>,
    /// Condition whose result is shown.
    pub active: Option<Condition>,
    pub loading: bool,
    /// Set when a finished, uncancelled run computed no condition.
    pub error: Option<String>,
}

impl ResultsSnapshot {
    pub fn get(&self, condition: Condition) -> Option<&ConditionQueryResult> {
        self.results.get(&condition)
    }

    pub fn active_result(&self) -> Option<&ConditionQueryResult> {
        self.active.and_then(|condition| self.get(condition))
    }
}

/// Outcome of one call to `run`, independent of later runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub generation: u64,
    pub results: BTreeMap<Condition, ConditionQueryResult>,
    pub active: Option<Condition>,
    pub error: Option<String>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn ok_count(&self) -> usize {
        self.results.values().filter(|result| result.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(ConditionQueryResult::error("boom")).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
        assert_eq!(
            serde_json::to_value(ConditionQueryResult::Aborted).unwrap(),
            json!({"status": "aborted"})
        );
        assert_eq!(
            serde_json::to_value(ConditionQueryResult::Insufficient(InsufficientSample {
                message: Some("too few days".to_string()),
                sample: None,
            }))
            .unwrap(),
            json!({"status": "insufficient", "message": "too few days", "sample": null})
        );
    }

    #[test]
    fn test_accessors() {
        let error = ConditionQueryResult::error("boom");
        assert!(!error.is_ok());
        assert_eq!(error.probability(), None);
        assert_eq!(error.message(), Some("boom"));
        assert_eq!(ConditionQueryResult::Aborted.message(), None);
    }
}
