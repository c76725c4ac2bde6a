// Re-export modules
pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod results;
pub mod scoring;
pub mod store;
pub mod urls;

// Re-export commonly used types for convenience
pub use client::{AnalysisApi, HttpAnalysisApi};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, ApiError, StoreError};
pub use orchestrator::Orchestrator;
pub use orchestrator::session::{Phase, SessionHandle, SessionState};
pub use results::{
    AnalysisResult, AnalysisStatus, AnalyticsScores, Impact, Metadata, Recommendation, ScoreBand,
};
pub use scoring::calculate_scores;
pub use store::{AnalysisStore, MemoryStore};
pub use urls::{is_valid_url, normalize_url};
