use crate::results::AnalysisResult;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lifecycle phase of one analysis session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
    TimedOut,
    SubmitError,
    PollError,
}

impl Phase {
    /// Terminal phases never transition further without a new submission
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::Completed
                | Phase::Failed
                | Phase::TimedOut
                | Phase::SubmitError
                | Phase::PollError
        )
    }
}

/// Mutable state of the one in-flight analysis session.
///
/// Invariants: `progress` reaches 100 only in [`Phase::Completed`],
/// and `is_analyzing` is false exactly when the phase is terminal or
/// the session never started.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Raw URL as the user entered it
    pub url: String,

    /// Validation message when the URL was rejected locally
    pub url_error: Option<String>,

    /// True from submission until a terminal phase is reached
    pub is_analyzing: bool,

    /// Job identifier once the service has accepted the submission
    pub task_id: Option<String>,

    /// Scored result once the session completed
    pub result: Option<AnalysisResult>,

    /// Progress estimate in 0-100
    pub progress: u8,

    /// User-facing message for a failed, timed-out, or errored session
    pub error: Option<String>,

    pub phase: Phase,
}

impl SessionState {
    /// Clear everything from a previous session before a new submission
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

/// Shared, observable handle to a session's state.
///
/// The orchestrator owns the only writer paths; UI code clones the
/// handle and reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state for display
    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    /// Mutate the state under the lock
    pub(crate) async fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.inner.lock().await;
        apply(&mut state);
    }
}
