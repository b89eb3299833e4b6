//! Analysis repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::QuizAnalysisResult;
use crate::domain::error::DomainError;
use crate::domain::identity::CallerIdentity;

#[cfg(test)]
use mockall::automock;

/// An analysis together with the caller it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub owner: String,
    pub stored_at: DateTime<Utc>,
    pub result: QuizAnalysisResult,
}

impl StoredAnalysis {
    pub fn new(owner: &CallerIdentity, result: QuizAnalysisResult) -> Self {
        Self {
            owner: owner.as_key_segment().to_string(),
            stored_at: Utc::now(),
            result,
        }
    }

    pub fn is_owned_by(&self, identity: &CallerIdentity) -> bool {
        self.owner == identity.as_key_segment()
    }
}

/// Repository for quiz analyses, scoped per caller
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Stores an analysis, replacing any previous one for the same caller and quiz
    async fn save(&self, analysis: StoredAnalysis) -> Result<StoredAnalysis, DomainError>;

    /// Finds the caller's analysis of a quiz
    async fn find(
        &self,
        owner: &CallerIdentity,
        quiz_id: &str,
    ) -> Result<Option<StoredAnalysis>, DomainError>;

    /// Lists the caller's analyses, newest first
    async fn list_by_owner(
        &self,
        owner: &CallerIdentity,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredAnalysis>, DomainError>;

    /// Counts the caller's analyses
    async fn count_by_owner(&self, owner: &CallerIdentity) -> Result<usize, DomainError>;

    /// Latest analysis of the caller, if any
    async fn latest(&self, owner: &CallerIdentity) -> Result<Option<StoredAnalysis>, DomainError> {
        Ok(self.list_by_owner(owner, 1, 0).await?.into_iter().next())
    }
}
