pub mod session;

#[cfg(test)]
mod tests;

use crate::client::AnalysisApi;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::results::{AnalysisResult, AnalysisStatus, SubmitRequest};
use crate::scoring;
use crate::store::AnalysisStore;
use crate::urls::{UrlValidator, normalize_url};
use session::{Phase, SessionHandle};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// How much the estimated progress advances per tick
const PROGRESS_STEP: u8 = 10;

/// The estimate never passes this until completion is confirmed
const PROGRESS_CEILING: u8 = 90;

/// Message for a rejected URL
const URL_ERROR_MESSAGE: &str = "Please enter a valid website URL";

/// Message shown when the polling budget runs out
const TIMEOUT_MESSAGE: &str = "Analysis is taking longer than expected. Please try again later.";

/// Fallback when the service reports failure without a reason
const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Fallback for transport errors while polling
const POLL_ERROR_MESSAGE: &str = "Could not retrieve analysis status. Please try again.";

/// Drives one analysis session at a time from URL submission to a
/// terminal phase, scoring and persisting the result on completion.
///
/// Collaborators are injected: the remote service behind
/// [`AnalysisApi`] and the persistence layer behind [`AnalysisStore`].
pub struct Orchestrator<A, S> {
    api: A,
    store: S,
    config: AnalysisConfig,
    validator: UrlValidator,
    session: SessionHandle,
    stop: Option<Arc<AtomicBool>>,
}

impl<A: AnalysisApi, S: AnalysisStore> Orchestrator<A, S> {
    pub fn new(api: A, store: S, config: AnalysisConfig) -> Self {
        Self {
            api,
            store,
            config,
            validator: UrlValidator::new(),
            session: SessionHandle::new(),
            stop: None,
        }
    }

    /// Observable handle to the session state
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Run one analysis to a terminal phase.
    ///
    /// A session still in flight from a previous call is cancelled
    /// first: its stop flag is raised so the superseded progress
    /// ticker halts before the new session's state is touched.
    pub async fn start_analysis(
        &mut self,
        raw_url: &str,
        user_id: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.cancel_timers();

        self.session
            .update(|state| {
                state.reset();
                state.url = raw_url.to_string();
            })
            .await;

        if !self.validator.is_valid(raw_url) {
            ::log::warn!("Rejected invalid URL: {:?}", raw_url);
            self.session
                .update(|state| state.url_error = Some(URL_ERROR_MESSAGE.to_string()))
                .await;
            return Err(AnalysisError::InvalidUrl(raw_url.to_string()));
        }

        let url = normalize_url(raw_url);
        ::log::info!("Starting analysis for: {}", url);

        let stop = Arc::new(AtomicBool::new(false));
        self.stop = Some(Arc::clone(&stop));

        self.session
            .update(|state| {
                state.phase = Phase::Submitting;
                state.is_analyzing = true;
            })
            .await;

        spawn_progress_ticker(
            self.session.clone(),
            Arc::clone(&stop),
            self.config.progress_interval(),
        );

        let request = SubmitRequest {
            url: url.clone(),
            depth: self.config.depth,
            priority: self.config.priority,
        };
        let submitted = match self.api.submit(&request).await {
            Ok(response) => response,
            Err(e) => {
                ::log::error!("Failed to submit analysis for {}: {}", url, e);
                self.finish(
                    Phase::SubmitError,
                    Some(format!("Failed to start analysis: {}", e)),
                    None,
                )
                .await;
                return Err(AnalysisError::Submit(e));
            }
        };

        ::log::debug!("Analysis job accepted: {}", submitted.task_id);
        self.session
            .update(|state| {
                state.task_id = Some(submitted.task_id.clone());
                state.phase = Phase::Polling;
            })
            .await;

        self.poll_until_terminal(&submitted.task_id, &url, user_id, &stop)
            .await
    }

    /// Poll the service until the job reaches a terminal status or the
    /// attempt budget runs out. The job itself is never cancelled
    /// server-side; only client-side polling stops.
    async fn poll_until_terminal(
        &mut self,
        task_id: &str,
        url: &str,
        user_id: &str,
        stop: &Arc<AtomicBool>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let interval = self.config.polling_interval();
        let max_attempts = self.config.max_polling_attempts;

        for attempt in 1..=max_attempts {
            sleep(interval).await;
            if stop.load(Ordering::Relaxed) {
                // Superseded by a newer session; leave its state alone
                return Err(AnalysisError::PollTimeout { attempts: attempt });
            }

            ::log::debug!("Poll attempt {}/{} for task {}", attempt, max_attempts, task_id);
            let result = match self.api.status(task_id).await {
                Ok(result) => result,
                Err(e) => {
                    ::log::error!("Poll failed for task {}: {}", task_id, e);
                    self.finish(Phase::PollError, Some(POLL_ERROR_MESSAGE.to_string()), None)
                        .await;
                    return Err(AnalysisError::PollTransport(e));
                }
            };

            match result.status {
                AnalysisStatus::Completed => return self.complete(result, user_id).await,
                AnalysisStatus::Failed => {
                    let message = result
                        .error
                        .clone()
                        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                    ::log::warn!("Analysis failed for {}: {}", url, message);
                    self.finish(Phase::Failed, Some(message.clone()), Some(0)).await;
                    return Err(AnalysisError::JobFailed(message));
                }
                AnalysisStatus::Pending | AnalysisStatus::Other => {}
            }
        }

        ::log::warn!(
            "Analysis for {} still pending after {} attempts, giving up",
            url,
            max_attempts
        );
        self.finish(Phase::TimedOut, Some(TIMEOUT_MESSAGE.to_string()), None)
            .await;
        Err(AnalysisError::PollTimeout {
            attempts: max_attempts,
        })
    }

    /// Score the completed result, persist it best-effort, and move
    /// the session to its final state.
    async fn complete(
        &mut self,
        mut result: AnalysisResult,
        user_id: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.cancel_timers();

        let analytics = scoring::calculate_scores(&result.recommendations, &result.metadata);
        result.analytics = Some(analytics);

        // Saving is best effort: a storage failure must not hide the
        // result from the caller
        if let Err(e) = self.store.save(&result, user_id).await {
            ::log::warn!("Failed to save analysis {}: {}", result.task_id, e);
        }

        ::log::info!("Analysis completed for: {}", result.url);
        self.session
            .update(|state| {
                state.progress = 100;
                state.result = Some(result.clone());
                state.phase = Phase::Completed;
                state.is_analyzing = false;
                state.error = None;
            })
            .await;

        Ok(result)
    }

    /// Move the session to a terminal phase and stop both timers
    async fn finish(&mut self, phase: Phase, error: Option<String>, progress: Option<u8>) {
        self.cancel_timers();
        self.session
            .update(|state| {
                state.phase = phase;
                state.error = error;
                state.is_analyzing = false;
                if let Some(progress) = progress {
                    state.progress = progress;
                }
            })
            .await;
    }

    /// Raise the current session's stop flag. Safe to call repeatedly;
    /// raising an already-raised flag is a no-op.
    fn cancel_timers(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.store(true, Ordering::Relaxed);
        }
    }

    /// Saved analyses for a user, newest first
    pub async fn history(&self, user_id: &str) -> Result<Vec<AnalysisResult>, AnalysisError> {
        self.store
            .list_by_user(user_id)
            .await
            .map_err(AnalysisError::Persistence)
    }

    /// Look up a previously saved analysis by its task identifier
    pub async fn saved_analysis(
        &self,
        task_id: &str,
    ) -> Result<Option<AnalysisResult>, AnalysisError> {
        self.store
            .get_by_id(task_id)
            .await
            .map_err(AnalysisError::Persistence)
    }

    /// Remove a previously saved analysis
    pub async fn delete_analysis(&self, task_id: &str) -> Result<(), AnalysisError> {
        self.store
            .delete(task_id)
            .await
            .map_err(AnalysisError::Persistence)
    }
}

/// Background estimate of analysis progress: a fixed step per tick,
/// capped below 100 so only a confirmed completion can fill the bar.
fn spawn_progress_ticker(session: SessionHandle, stop: Arc<AtomicBool>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            sleep(interval).await;
            if stop.load(Ordering::Relaxed) {
                break;
            }
            session
                .update(|state| {
                    // Recheck under the lock so a cancelled ticker can
                    // never touch a newer session's progress
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                    if state.progress < PROGRESS_CEILING {
                        state.progress = (state.progress + PROGRESS_STEP).min(PROGRESS_CEILING);
                    }
                })
                .await;
        }
        ::log::trace!("Progress ticker stopped");
    });
}
