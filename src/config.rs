use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for driving analyses against the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Base URL of the analysis API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How many status polls to attempt before giving up
    #[serde(default = "default_max_polling_attempts")]
    pub max_polling_attempts: u32,

    /// Delay between status polls, in milliseconds
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,

    /// Delay between progress-estimate ticks, in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Crawl depth requested when submitting a job
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Priority requested when submitting a job
    #[serde(default = "default_priority")]
    pub priority: u32,
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            max_polling_attempts: default_max_polling_attempts(),
            polling_interval_ms: default_polling_interval_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            depth: default_depth(),
            priority: default_priority(),
        }
    }
}

/// Default value for api_base_url
fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Default value for max_polling_attempts
fn default_max_polling_attempts() -> u32 {
    30
}

/// Default value for polling_interval_ms
fn default_polling_interval_ms() -> u64 {
    2000
}

/// Default value for progress_interval_ms
fn default_progress_interval_ms() -> u64 {
    500
}

/// Default value for request_timeout_secs
fn default_request_timeout_secs() -> u64 {
    30
}

/// Default crawl depth for submitted jobs
fn default_depth() -> u32 {
    1
}

/// Default priority for submitted jobs
fn default_priority() -> u32 {
    1
}
