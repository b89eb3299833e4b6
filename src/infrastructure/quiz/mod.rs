//! Quiz infrastructure - question bank generator and analysis storage

mod in_memory_repository;
mod question_bank;

pub use in_memory_repository::InMemoryAnalysisRepository;
pub use question_bank::QuestionBankQuizGenerator;
