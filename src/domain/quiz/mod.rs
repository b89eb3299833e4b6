//! Quiz domain - generation requests, analyses and their validation

mod analysis;
mod difficulty;
mod generation;
mod generator;
mod question;
mod repository;
mod score;
mod validation;

pub use analysis::{
    normalize_timestamp, normalize_topic_name, overall_score, DifficultyPerformance,
    QuizAnalysisBuilder, QuizAnalysisResult, RawDifficultyPerformance, RawQuizAnalysis,
    RawTopicPerformance, TopicPerformance,
};
pub use difficulty::{Difficulty, UnknownDifficulty};
pub use generation::{
    QuizGenerationOptions, QuizGenerationRequest, RawQuizGenerationOptions,
    RawQuizGenerationRequest, TopicSelection, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT,
    MIN_QUESTION_COUNT,
};
pub use generator::QuizGenerator;
pub use question::{GeneratedQuiz, Question, QuestionView, TopicSummary};
pub use repository::{AnalysisRepository, StoredAnalysis};
pub use score::{ScoreBand, MASTERED_RATE, MEDIUM_RATE};
pub use validation::{FieldViolation, ValidationReport, ViolationReason};

#[cfg(test)]
pub use generator::MockQuizGenerator;
#[cfg(test)]
pub use repository::MockAnalysisRepository;
