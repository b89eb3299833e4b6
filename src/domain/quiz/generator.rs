//! Quiz generator trait

use async_trait::async_trait;

use super::generation::QuizGenerationRequest;
use super::question::{GeneratedQuiz, TopicSummary};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Produces quizzes from validated generation requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generates a quiz
    ///
    /// `weak_topics` holds normalized sub-topic names the caller performed
    /// poorly on; they are ordered first when the request prioritizes weak topics.
    async fn generate(
        &self,
        request: &QuizGenerationRequest,
        weak_topics: &[String],
    ) -> Result<GeneratedQuiz, DomainError>;

    /// Lists available topics, optionally limited to one main topic
    async fn topics(&self, main_topic_id: Option<String>) -> Result<Vec<TopicSummary>, DomainError>;
}
