//! Infrastructure services

mod quiz_service;

pub use quiz_service::{AnalysisPage, QuizService, QuizServiceTrait};
