use crate::error::StoreError;
use crate::results::{AnalysisResult, AnalyticsScores};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Seam to wherever scored analyses are kept per user.
///
/// Saves are upserts keyed on the task identifier: re-saving a result
/// replaces the stored row instead of duplicating it.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert or replace the row for this result's task id
    async fn save(&self, result: &AnalysisResult, user_id: &str) -> Result<(), StoreError>;

    /// All analyses saved for a user, newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, StoreError>;

    /// Look up one analysis by its task id
    async fn get_by_id(&self, task_id: &str) -> Result<Option<AnalysisResult>, StoreError>;

    /// Remove an analysis; removing an unknown task id is a no-op
    async fn delete(&self, task_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: AnalysisStore + ?Sized> AnalysisStore for Arc<T> {
    async fn save(&self, result: &AnalysisResult, user_id: &str) -> Result<(), StoreError> {
        (**self).save(result, user_id).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        (**self).list_by_user(user_id).await
    }

    async fn get_by_id(&self, task_id: &str) -> Result<Option<AnalysisResult>, StoreError> {
        (**self).get_by_id(task_id).await
    }

    async fn delete(&self, task_id: &str) -> Result<(), StoreError> {
        (**self).delete(task_id).await
    }
}

/// In-memory store used by the CLI and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredAnalysis>>,
}

#[derive(Debug, Clone)]
struct StoredAnalysis {
    user_id: String,
    result: AnalysisResult,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn save(&self, result: &AnalysisResult, user_id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        if let Some(existing) = rows
            .iter_mut()
            .find(|row| row.result.task_id == result.task_id)
        {
            existing.user_id = user_id.to_string();
            existing.result = result.clone();
        } else {
            rows.push(StoredAnalysis {
                user_id: user_id.to_string(),
                result: result.clone(),
            });
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        let rows = self.rows.lock().await;
        let mut results: Vec<AnalysisResult> = rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| with_default_scores(row.result.clone()))
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn get_by_id(&self, task_id: &str) -> Result<Option<AnalysisResult>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|row| row.result.task_id == task_id)
            .map(|row| with_default_scores(row.result.clone())))
    }

    async fn delete(&self, task_id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        rows.retain(|row| row.result.task_id != task_id);
        Ok(())
    }
}

/// Rows saved before scoring existed get the neutral default scores
fn with_default_scores(mut result: AnalysisResult) -> AnalysisResult {
    if result.analytics.is_none() {
        result.analytics = Some(AnalyticsScores::default());
    }
    result
}
