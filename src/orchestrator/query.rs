use crate::orchestrator::error::{QueryError, ValidationError};
use crate::orchestrator::result::{ConditionQueryResult, ResultsSnapshot, RunReport};
use crate::orchestrator::settings::PollSettings;
use crate::service::error::{JobStage, UNEXPECTED_RESPONSE_MESSAGE};
use crate::service::job_service::{JobPoll, JobService};
use crate::types::catalog::ConditionCatalog;
use crate::types::condition::Condition;
use crate::types::location::Place;
use crate::types::request::JobRequest;
use crate::view::builder::build_view;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const NO_CONDITION_MESSAGE: &str =
    "No condition could be computed for the selected location and date.";

/// Resolves to `None` as soon as `token` is cancelled, otherwise to the output of `future`.
async fn cancellable<F: Future>(token: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = future => Some(output),
    }
}

struct RunControl {
    generation: u64,
    token: CancellationToken,
}

/// Runs the per-condition jobs of one location and date, one condition at a time, and
/// publishes each result as soon as it is known.
///
/// Starting a new run cancels the previous one. A superseded run finishes quietly: it
/// still returns its own [`RunReport`] but never writes to the published snapshot again.
///
/// # Examples
///
/// ```no_run
/// # use cronoweath::{
/// #     Condition, HttpJobService, LatLon, Place, PollSettings, QueryOrchestrator,
/// # };
/// # use chrono::NaiveDate;
/// # use std::time::Duration;
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let service = HttpJobService::new("http://localhost:8000", Duration::from_secs(30))?;
/// let orchestrator = QueryOrchestrator::new(service, PollSettings::default());
///
/// let report = orchestrator
///     .run()
///     .location(Place::new("Lima", LatLon(-12.0464, -77.0428)))
///     .target_date(NaiveDate::from_ymd_opt(2025, 7, 28).unwrap())
///     .conditions(vec![Condition::Hot, Condition::Wet])
///     .call()
///     .await?;
/// println!("{} of 2 conditions computed", report.ok_count());
/// # Ok(())
/// # }
/// ```
pub struct QueryOrchestrator<S> {
    service: S,
    settings: PollSettings,
    control: Mutex<RunControl>,
    snapshot: watch::Sender<ResultsSnapshot>,
}

#[bon]
impl<S: JobService> QueryOrchestrator<S> {
    pub fn new(service: S, settings: PollSettings) -> Self {
        let (snapshot, _) = watch::channel(ResultsSnapshot::default());
        Self {
            service,
            settings,
            control: Mutex::new(RunControl {
                generation: 0,
                token: CancellationToken::new(),
            }),
            snapshot,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    fn lock_control(&self) -> MutexGuard<'_, RunControl> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receiver of every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ResultsSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> ResultsSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Cancels the current run. Its in-flight condition becomes `Aborted` and no further
    /// condition is started.
    pub fn cancel(&self) {
        self.lock_control().token.cancel();
    }

    /// Cancels the current run and clears every published result.
    pub fn reset(&self) {
        let mut control = self.lock_control();
        control.token.cancel();
        control.generation += 1;
        let generation = control.generation;
        self.snapshot.send_replace(ResultsSnapshot {
            generation,
            ..ResultsSnapshot::default()
        });
    }

    /// Shows `condition`'s result. Returns `false` when it has no result yet.
    pub fn select_active(&self, condition: Condition) -> bool {
        let _control = self.lock_control();
        self.snapshot.send_if_modified(|snapshot| {
            if !snapshot.results.contains_key(&condition) || snapshot.active == Some(condition) {
                return false;
            }
            snapshot.active = Some(condition);
            true
        });
        self.snapshot.borrow().active == Some(condition)
    }

    /// Supersedes the current run and publishes an empty loading snapshot.
    fn begin_run(&self) -> (u64, CancellationToken) {
        let mut control = self.lock_control();
        control.token.cancel();
        control.generation += 1;
        control.token = CancellationToken::new();
        let generation = control.generation;
        self.snapshot.send_replace(ResultsSnapshot {
            generation,
            loading: true,
            ..ResultsSnapshot::default()
        });
        (generation, control.token.clone())
    }

    /// Applies `update` to the published snapshot unless `generation` was superseded.
    fn publish(&self, generation: u64, update: impl FnOnce(&mut ResultsSnapshot)) -> bool {
        let control = self.lock_control();
        if control.generation != generation {
            return false;
        }
        self.snapshot.send_modify(update);
        true
    }

    /// Queries every condition for `location` on `target_date`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(Place)`: **Required.** Where to query.
    /// * `.target_date(NaiveDate)`: **Required.** Only its month and day matter to the
    ///   backend; the card shows the full date.
    /// * `.conditions(Vec<Condition>)`: **Required.** Queried in this order, duplicates
    ///   are dropped.
    /// * `.catalog(ConditionCatalog)`: Optional. Logic, thresholds and sampling policy.
    ///   Defaults to [`ConditionCatalog::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Validation`] before anything is published when an input is
    /// missing. Failures of single conditions are not errors: they are reported as
    /// [`ConditionQueryResult::Error`] values.
    #[builder]
    pub async fn run(
        &self,
        location: Option<Place>,
        target_date: Option<NaiveDate>,
        #[builder(default)] conditions: Vec<Condition>,
        catalog: Option<ConditionCatalog>,
    ) -> Result<RunReport, QueryError> {
        let place = location.ok_or(ValidationError::MissingLocation)?;
        let target_date = target_date.ok_or(ValidationError::MissingDate)?;
        let mut unique: Vec<Condition> = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if !unique.contains(&condition) {
                unique.push(condition);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::NoConditions.into());
        }
        let catalog = catalog.unwrap_or_default();

        let (generation, token) = self.begin_run();
        info!(
            "Querying {} conditions for {} on {}",
            unique.len(),
            place.label,
            target_date
        );

        let mut results = BTreeMap::new();
        let mut active = None;
        let mut cancelled = false;

        for condition in unique {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }
            let request = JobRequest::new(&place, target_date, condition, &catalog);
            let result = self
                .query_condition(&request, condition, target_date, &place.label, &token)
                .await;

            let is_ok = result.is_ok();
            let aborted = matches!(result, ConditionQueryResult::Aborted);
            if is_ok && active.is_none() {
                active = Some(condition);
            }
            results.insert(condition, result.clone());
            self.publish(generation, |snapshot| {
                snapshot.results.insert(condition, result);
                if is_ok && snapshot.active.is_none() {
                    snapshot.active = Some(condition);
                }
            });

            if aborted {
                cancelled = true;
                break;
            }
        }

        let cancelled = cancelled || token.is_cancelled();
        let error = if !cancelled && !results.values().any(ConditionQueryResult::is_ok) {
            Some(NO_CONDITION_MESSAGE.to_string())
        } else {
            None
        };
        self.publish(generation, |snapshot| {
            snapshot.loading = false;
            snapshot.error = error.clone();
        });

        let report = RunReport {
            generation,
            results,
            active,
            error,
            cancelled,
        };
        info!(
            "Run {} finished: {} of {} conditions computed{}",
            generation,
            report.ok_count(),
            report.results.len(),
            if cancelled { " (cancelled)" } else { "" }
        );
        Ok(report)
    }

    /// Submits, polls and interprets one condition.
    async fn query_condition(
        &self,
        request: &JobRequest,
        condition: Condition,
        target_date: NaiveDate,
        location_label: &str,
        token: &CancellationToken,
    ) -> ConditionQueryResult {
        let ticket = match cancellable(token, self.service.submit(request)).await {
            None => return ConditionQueryResult::Aborted,
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                warn!("Failed to start condition {}: {}", condition, e);
                return ConditionQueryResult::error(e.user_message(JobStage::Start, condition));
            }
        };

        let deadline = Instant::now() + self.settings.max_wait;
        let timed_out = || {
            warn!(
                "Condition {} still pending after {:?}",
                condition, self.settings.max_wait
            );
            ConditionQueryResult::error(format!("Maximum wait exceeded for condition {condition}"))
        };
        let answer = loop {
            if Instant::now() >= deadline {
                return timed_out();
            }
            if cancellable(token, tokio::time::sleep(self.settings.poll_interval))
                .await
                .is_none()
            {
                return ConditionQueryResult::Aborted;
            }
            let poll = tokio::time::timeout_at(deadline, self.service.poll(&ticket.query_id));
            match cancellable(token, poll).await {
                None => return ConditionQueryResult::Aborted,
                Some(Err(_)) => return timed_out(),
                Some(Ok(Ok(JobPoll::Pending))) => continue,
                Some(Ok(Ok(answer))) => break answer,
                Some(Ok(Err(e))) => {
                    warn!("Failed to fetch condition {}: {}", condition, e);
                    return ConditionQueryResult::error(e.user_message(JobStage::Fetch, condition));
                }
            }
        };

        match answer {
            JobPoll::Ready(response) => {
                if response.query_id.as_deref() != Some(ticket.query_id.as_str()) {
                    warn!(
                        "Result for condition {} answers query {:?} instead of {}",
                        condition, response.query_id, ticket.query_id
                    );
                    return ConditionQueryResult::error(UNEXPECTED_RESPONSE_MESSAGE);
                }
                let view = build_view(&response, condition, target_date, location_label);
                ConditionQueryResult::Ok(Box::new(view))
            }
            JobPoll::Insufficient(payload) => ConditionQueryResult::Insufficient(payload),
            JobPoll::Failed(message) => {
                warn!("Condition {} failed: {}", condition, message);
                ConditionQueryResult::Error { message }
            }
            JobPoll::Pending => ConditionQueryResult::error(UNEXPECTED_RESPONSE_MESSAGE),
        }
    }
}

impl<S> Drop for QueryOrchestrator<S> {
    fn drop(&mut self) {
        self.control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .cancel();
    }
}
