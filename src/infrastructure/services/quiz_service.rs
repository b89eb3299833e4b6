//! Quiz service - generation and analysis use cases

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::identity::CallerIdentity;
use crate::domain::quiz::{
    AnalysisRepository, GeneratedQuiz, QuizAnalysisResult, QuizGenerationRequest, QuizGenerator,
    RawQuizAnalysis, RawQuizGenerationRequest, StoredAnalysis, TopicSummary,
};

/// One page of a caller's analyses
#[derive(Debug, Clone)]
pub struct AnalysisPage {
    pub items: Vec<QuizAnalysisResult>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Trait for the quiz service (for dynamic dispatch in AppState)
#[async_trait]
pub trait QuizServiceTrait: Send + Sync + Debug {
    /// Lists question bank topics
    async fn topics(&self, main_topic_id: Option<String>) -> Result<Vec<TopicSummary>, DomainError>;

    /// Validates a generation request and produces a quiz
    async fn generate(
        &self,
        caller: &CallerIdentity,
        request: RawQuizGenerationRequest,
    ) -> Result<GeneratedQuiz, DomainError>;

    /// Builds and stores the analysis of a quiz attempt
    async fn submit_analysis(
        &self,
        caller: &CallerIdentity,
        quiz_id: &str,
        submission: RawQuizAnalysis,
    ) -> Result<QuizAnalysisResult, DomainError>;

    /// Fetches the caller's analysis of a quiz
    async fn get_analysis(
        &self,
        caller: &CallerIdentity,
        quiz_id: &str,
    ) -> Result<QuizAnalysisResult, DomainError>;

    /// Lists the caller's analyses, newest first; `page` starts at 1
    async fn list_analyses(
        &self,
        caller: &CallerIdentity,
        page: usize,
        limit: usize,
    ) -> Result<AnalysisPage, DomainError>;
}

/// Quiz service implementation
#[derive(Debug)]
pub struct QuizService<G: QuizGenerator, R: AnalysisRepository> {
    generator: Arc<G>,
    repository: Arc<R>,
}

impl<G: QuizGenerator, R: AnalysisRepository> QuizService<G, R> {
    pub fn new(generator: Arc<G>, repository: Arc<R>) -> Self {
        Self {
            generator,
            repository,
        }
    }

    /// Normalized weak sub-topics of the caller's latest analysis
    async fn weak_topics(&self, caller: &CallerIdentity) -> Result<Vec<String>, DomainError> {
        let latest = self.repository.latest(caller).await?;

        Ok(latest
            .map(|a| {
                a.result
                    .weak_topics
                    .into_iter()
                    .map(|t| t.normalized_sub_topic)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl<G, R> QuizServiceTrait for QuizService<G, R>
where
    G: QuizGenerator + Debug + 'static,
    R: AnalysisRepository + Debug + 'static,
{
    async fn topics(&self, main_topic_id: Option<String>) -> Result<Vec<TopicSummary>, DomainError> {
        self.generator.topics(main_topic_id).await
    }

    #[instrument(skip(self, request), fields(caller = %caller))]
    async fn generate(
        &self,
        caller: &CallerIdentity,
        request: RawQuizGenerationRequest,
    ) -> Result<GeneratedQuiz, DomainError> {
        let request = QuizGenerationRequest::validate(&request).map_err(DomainError::invalid_input)?;

        let weak_topics = if request.options().prioritize_weak_topics() {
            self.weak_topics(caller).await?
        } else {
            Vec::new()
        };
        debug!(weak_topics = ?weak_topics, "Generating quiz");

        let quiz = self.generator.generate(&request, &weak_topics).await?;
        info!(quiz_id = %quiz.quiz_id, questions = quiz.questions.len(), "Generated quiz");

        Ok(quiz)
    }

    #[instrument(skip(self, submission), fields(caller = %caller))]
    async fn submit_analysis(
        &self,
        caller: &CallerIdentity,
        quiz_id: &str,
        submission: RawQuizAnalysis,
    ) -> Result<QuizAnalysisResult, DomainError> {
        let result = submission
            .into_builder(quiz_id)
            .map_err(DomainError::invalid_input)?
            .build();

        let stored = self
            .repository
            .save(StoredAnalysis::new(caller, result))
            .await?;
        info!(
            quiz_id = %quiz_id,
            overall_score = stored.result.overall_score,
            "Stored quiz analysis"
        );

        Ok(stored.result)
    }

    async fn get_analysis(
        &self,
        caller: &CallerIdentity,
        quiz_id: &str,
    ) -> Result<QuizAnalysisResult, DomainError> {
        self.repository
            .find(caller, quiz_id)
            .await?
            .map(|a| a.result)
            .ok_or_else(|| DomainError::not_found(format!("Analysis for quiz '{}'", quiz_id)))
    }

    async fn list_analyses(
        &self,
        caller: &CallerIdentity,
        page: usize,
        limit: usize,
    ) -> Result<AnalysisPage, DomainError> {
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(limit);

        let items = self
            .repository
            .list_by_owner(caller, limit, offset)
            .await?
            .into_iter()
            .map(|a| a.result)
            .collect();
        let total = self.repository.count_by_owner(caller).await?;

        Ok(AnalysisPage {
            items,
            total,
            page,
            limit,
        })
    }
}
