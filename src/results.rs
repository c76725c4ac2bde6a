use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity level attached to a recommendation by the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
    /// Any level the service sends that we do not recognize
    #[serde(other)]
    Unknown,
}

/// A single improvement suggestion for the analyzed site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Free-form category label (e.g. "seo", "user_experience")
    pub category: String,

    /// Short headline for the suggestion
    pub title: String,

    /// Longer explanation of the finding
    pub description: String,

    /// How much fixing this would move the needle
    pub impact: Impact,

    /// How much work fixing this would take
    pub effort: Impact,

    /// Ordered implementation steps
    #[serde(default)]
    pub steps: Vec<String>,

    /// What the site owner stands to gain
    pub potential_benefit: String,

    /// Rank among the report's recommendations (1 = most urgent)
    pub priority: u32,
}

/// Page-level facts gathered while the site was analyzed.
///
/// Every field is optional: the service omits what it could not
/// measure, and a missing value is distinct from an empty or zero one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,

    /// Total page weight in bytes
    pub page_size: Option<u64>,

    /// Observed load time in seconds
    pub load_time: Option<f64>,

    pub image_count: Option<u32>,
    pub external_links: Option<u32>,

    /// Meta tag name to content mapping
    pub meta_tags: Option<HashMap<String, String>>,

    /// Response header name to value mapping
    pub headers: Option<HashMap<String, String>>,
}

/// Lifecycle state of an analysis job on the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Completed,
    Failed,
    /// Unrecognized status strings are treated as still in progress
    #[serde(other)]
    Other,
}

impl AnalysisStatus {
    /// Completed and failed jobs never change state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

/// One analysis job and everything the remote service reported for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Opaque job identifier assigned by the service
    pub task_id: String,

    /// URL that was analyzed
    pub url: String,

    /// Current job state
    pub status: AnalysisStatus,

    /// Improvement suggestions, in the service's priority order
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,

    /// Page-level facts about the analyzed site
    #[serde(default)]
    pub metadata: Metadata,

    /// Prose summary of the findings (if the service produced one)
    #[serde(default)]
    pub summary: Option<String>,

    /// Failure reason when status is failed
    #[serde(default)]
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Locally derived quality scores, attached after scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsScores>,
}

/// Four derived quality scores, each an integer in 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsScores {
    pub seo_score: u8,
    pub performance_score: u8,
    pub accessibility_score: u8,
    pub best_practices_score: u8,
}

impl Default for AnalyticsScores {
    /// Neutral fallback for stored rows that predate local scoring
    fn default() -> Self {
        Self {
            seo_score: 75,
            performance_score: 75,
            accessibility_score: 75,
            best_practices_score: 75,
        }
    }
}

/// Reading band for presenting a score to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => ScoreBand::Excellent,
            70..=89 => ScoreBand::Good,
            50..=69 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

/// Payload for creating a new analysis job
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub url: String,
    pub depth: u32,
    pub priority: u32,
}

/// Acknowledgement returned when a job is created
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub task_id: String,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_impact_falls_back() {
        let rec: Recommendation = serde_json::from_str(
            r#"{
                "category": "seo",
                "title": "t",
                "description": "d",
                "impact": "critical",
                "effort": "low",
                "steps": [],
                "potential_benefit": "b",
                "priority": 1
            }"#,
        )
        .unwrap();
        assert_eq!(rec.impact, Impact::Unknown);
        assert_eq!(rec.effort, Impact::Low);
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let status: AnalysisStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(status, AnalysisStatus::Other);
        assert!(!status.is_terminal());
        assert!(AnalysisStatus::Completed.is_terminal());
        assert!(AnalysisStatus::Failed.is_terminal());
        assert!(!AnalysisStatus::Pending.is_terminal());
    }

    #[test]
    fn test_result_roundtrip_without_analytics() {
        let json = r#"{
            "task_id": "t1",
            "url": "https://example.com",
            "status": "pending",
            "recommendations": [],
            "metadata": {},
            "summary": null,
            "error": null,
            "created_at": "2025-02-24T10:30:00Z",
            "completed_at": "2025-02-24T10:30:00Z"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.task_id, "t1");
        assert!(result.analytics.is_none());

        // Analytics are only written once scoring has attached them
        let serialized = serde_json::to_string(&result).unwrap();
        assert!(!serialized.contains("analytics"));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(95), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(75), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(55), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(20), ScoreBand::Poor);
    }
}
