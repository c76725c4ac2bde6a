use crate::config::AnalysisConfig;
use crate::error::ApiError;
use crate::results::{AnalysisResult, SubmitRequest, SubmitResponse};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Seam to the remote analysis service.
///
/// The orchestrator only sees this trait; tests substitute scripted
/// doubles for the HTTP client.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Create a new analysis job
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError>;

    /// Fetch the current state of a job by its task identifier
    async fn status(&self, task_id: &str) -> Result<AnalysisResult, ApiError>;
}

#[async_trait]
impl<T: AnalysisApi + ?Sized> AnalysisApi for Arc<T> {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError> {
        (**self).submit(request).await
    }

    async fn status(&self, task_id: &str) -> Result<AnalysisResult, ApiError> {
        (**self).status(task_id).await
    }
}

/// HTTP client for the analysis API
#[derive(Debug, Clone)]
pub struct HttpAnalysisApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalysisApi {
    /// Build a client from configuration
    pub fn new(config: &AnalysisConfig) -> Result<Self, ApiError> {
        // Fail early on an unusable base URL instead of on first request
        Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::Transport(format!("invalid API base URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ApiError> {
        let url = format!("{}/api/v1/analyze", self.base_url);
        ::log::debug!("Submitting analysis job for: {}", request.url);

        let response = self.client.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn status(&self, task_id: &str) -> Result<AnalysisResult, ApiError> {
        let url = format!("{}/api/v1/analysis/{}", self.base_url, task_id);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Turn a non-success response into a status error carrying its body
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = AnalysisConfig {
            api_base_url: "not a url".to_string(),
            ..AnalysisConfig::default()
        };
        assert!(HttpAnalysisApi::new(&config).is_err());
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = AnalysisConfig {
            api_base_url: "http://localhost:8080/".to_string(),
            ..AnalysisConfig::default()
        };
        let api = HttpAnalysisApi::new(&config).unwrap();
        assert_eq!(api.base_url, "http://localhost:8080");
    }
}
