
use crate::client::AnalysisApi;
use crate::config::AnalysisConfig;
use crate::error::{ApiError, StoreError};
use crate::results::{
    AnalysisResult, AnalysisStatus, Impact, Metadata, Recommendation, SubmitRequest,
    SubmitResponse,
};
use crate::store::AnalysisStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Configuration with intervals short enough for fast tests
fn test_config(max_polling_attempts: u32) -> AnalysisConfig {
    AnalysisConfig {
        api_base_url: "http://localhost:0".to_string(),
        max_polling_attempts,
        polling_interval_ms: 5,
        progress_interval_ms: 2,
        request_timeout_secs: 1,
        depth: 1,
        priority: 1,
    }
}

fn pending_result() -> AnalysisResult {
    AnalysisResult {
        task_id: "t1".to_string(),
        url: "https://example.com".to_string(),
        status: AnalysisStatus::Pending,
        recommendations: vec![],
        metadata: Metadata::default(),
        summary: None,
        error: None,
        created_at: Utc::now(),
        completed_at: Utc::now(),
        analytics: None,
    }
}

/// Completed report with one low-impact performance recommendation and
/// a short page title
fn completed_result() -> AnalysisResult {
    AnalysisResult {
        status: AnalysisStatus::Completed,
        recommendations: vec![Recommendation {
            category: "performance".to_string(),
            title: "Optimize image sizes".to_string(),
            description: "Large images slow down page loads".to_string(),
            impact: Impact::Low,
            effort: Impact::Low,
            steps: vec!["Compress oversized images".to_string()],
            potential_benefit: "Faster page loads".to_string(),
            priority: 1,
        }],
        metadata: Metadata {
            title: Some("Example".to_string()),
            ..Metadata::default()
        },
        ..pending_result()
    }
}

fn failed_result(error: Option<&str>) -> AnalysisResult {
    AnalysisResult {
        status: AnalysisStatus::Failed,
        error: error.map(str::to_string),
        ..pending_result()
    }
}

/// One scripted poll response
enum PollStep {
    Respond(AnalysisResult),
    Fail(String),
}

/// Scripted double for the remote analysis service.
///
/// Serves the scripted poll responses in order, then keeps answering
/// "pending"; counts every call it receives.
struct MockApi {
    fail_submit: bool,
    script: Mutex<VecDeque<PollStep>>,
    submits: AtomicUsize,
    polls: AtomicUsize,
    last_submitted_url: Mutex<Option<String>>,
}

impl MockApi {
    fn with_script(script: Vec<PollStep>) -> Self {
        Self {
            fail_submit: false,
            script: Mutex::new(script.into_iter().collect()),
            submits: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            last_submitted_url: Mutex::new(None),
        }
    }

    /// Pending for `pending_polls` checks, then the given result
    fn pending_then(result: AnalysisResult, pending_polls: usize) -> Self {
        let mut script: Vec<PollStep> = (0..pending_polls)
            .map(|_| PollStep::Respond(pending_result()))
            .collect();
        script.push(PollStep::Respond(result));
        Self::with_script(script)
    }

    /// Never reaches a terminal status
    fn always_pending() -> Self {
        Self::with_script(vec![])
    }

    fn failing_submit() -> Self {
        Self {
            fail_submit: true,
            ..Self::with_script(vec![])
        }
    }

    fn submit_count(&self) -> usize {
        self.submits.load(Ordering::Relaxed)
    }

    fn poll_count(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }

    async fn last_submitted_url(&self) -> Option<String> {
        self.last_submitted_url.lock().await.clone()
    }
}

#[async_trait]
impl AnalysisApi for MockApi {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError> {
        self.submits.fetch_add(1, Ordering::Relaxed);
        *self.last_submitted_url.lock().await = Some(request.url.clone());

        if self.fail_submit {
            return Err(ApiError::Status {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        Ok(SubmitResponse {
            task_id: "t1".to_string(),
            status: AnalysisStatus::Pending,
            message: None,
        })
    }

    async fn status(&self, _task_id: &str) -> Result<AnalysisResult, ApiError> {
        self.polls.fetch_add(1, Ordering::Relaxed);
        match self.script.lock().await.pop_front() {
            Some(PollStep::Respond(result)) => Ok(result),
            Some(PollStep::Fail(message)) => Err(ApiError::Transport(message)),
            None => Ok(pending_result()),
        }
    }
}

/// Store double whose saves always fail
struct FailingStore;

#[async_trait]
impl AnalysisStore for FailingStore {
    async fn save(&self, _result: &AnalysisResult, _user_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("disk full".to_string()))
    }

    async fn list_by_user(&self, _user_id: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        Ok(vec![])
    }

    async fn get_by_id(&self, _task_id: &str) -> Result<Option<AnalysisResult>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _task_id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
