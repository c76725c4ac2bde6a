use thiserror::Error;

/// Terminal outcome of an analysis session that did not produce a result
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input failed URL validation; nothing was sent to the network
    #[error("invalid URL: {0:?}")]
    InvalidUrl(String),

    /// Creating the analysis job failed
    #[error("failed to submit analysis job: {0}")]
    Submit(#[source] ApiError),

    /// A status check failed in transit
    #[error("failed to poll analysis status: {0}")]
    PollTransport(#[source] ApiError),

    /// The service reported the job as failed
    #[error("analysis failed: {0}")]
    JobFailed(String),

    /// The polling budget ran out before the job reached a terminal state
    #[error("analysis did not finish after {attempts} polling attempts")]
    PollTimeout { attempts: u32 },

    /// A save or delete against the persistence collaborator failed
    #[error("failed to persist analysis: {0}")]
    Persistence(#[source] StoreError),
}

/// Failure talking to the remote analysis service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout, or malformed-response failure
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status code
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Failure in the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("analysis {0} not found")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
