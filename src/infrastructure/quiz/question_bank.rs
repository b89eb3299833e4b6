//! Quiz generator backed by an in-process question bank

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::quiz::{
    GeneratedQuiz, Question, QuizGenerationRequest, QuizGenerator, TopicSummary,
    normalize_topic_name,
};

/// Selects questions from a fixed question bank
#[derive(Debug, Default)]
pub struct QuestionBankQuizGenerator {
    questions: Vec<Question>,
}

impl QuestionBankQuizGenerator {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Loads a question bank from a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let questions: Vec<Question> = serde_json::from_str(json)
            .map_err(|e| DomainError::configuration(format!("Invalid question bank: {}", e)))?;

        for question in &questions {
            if question.correct_option >= question.options.len() {
                return Err(DomainError::configuration(format!(
                    "Question '{}' has no option at index {}",
                    question.id, question.correct_option
                )));
            }
        }

        Ok(Self::new(questions))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read question bank '{}': {}",
                path.display(),
                e
            ))
        })?;

        let generator = Self::from_json(&json)?;
        info!(path = %path.display(), questions = generator.len(), "Loaded question bank");
        Ok(generator)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn select(&self, request: &QuizGenerationRequest, weak_topics: &[String]) -> Vec<&Question> {
        let options = request.options();

        let mut candidates: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| {
                request
                    .topics()
                    .is_none_or(|t| t.covers(&q.main_topic_id, &q.sub_topic_id))
            })
            .filter(|q| options.difficulty().accepts(q.difficulty))
            .collect();

        if options.randomize() {
            candidates.shuffle(&mut rand::thread_rng());
        }

        if options.prioritize_weak_topics() && !weak_topics.is_empty() {
            let weak: HashSet<&str> = weak_topics.iter().map(String::as_str).collect();
            // Stable: keeps the shuffled (or bank) order within each group
            candidates.sort_by_key(|q| !weak.contains(normalize_topic_name(&q.sub_topic_id).as_str()));
        }

        candidates.truncate(options.question_count() as usize);
        candidates
    }
}

#[async_trait]
impl QuizGenerator for QuestionBankQuizGenerator {
    async fn generate(
        &self,
        request: &QuizGenerationRequest,
        weak_topics: &[String],
    ) -> Result<GeneratedQuiz, DomainError> {
        let selected = self.select(request, weak_topics);

        if selected.is_empty() {
            return Err(DomainError::not_found(
                "No questions match the requested topics and difficulty",
            ));
        }

        debug!(
            requested = request.options().question_count(),
            selected = selected.len(),
            "Selected quiz questions"
        );

        Ok(GeneratedQuiz::new(
            selected.into_iter().map(Question::view).collect(),
            request.options().time_limit_minutes(),
        ))
    }

    async fn topics(&self, main_topic_id: Option<String>) -> Result<Vec<TopicSummary>, DomainError> {
        let questions = self
            .questions
            .iter()
            .filter(|q| main_topic_id.as_deref().is_none_or(|id| q.main_topic_id == id));

        Ok(TopicSummary::summarize(questions))
    }
}
