//! Question bank entries and generated quizzes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::difficulty::Difficulty;

/// A question in the question bank, including its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub main_topic_id: String,
    pub sub_topic_id: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_option: usize,
}

impl Question {
    /// The question as shown to a quiz taker, without the answer
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id.clone(),
            main_topic_id: self.main_topic_id.clone(),
            sub_topic_id: self.sub_topic_id.clone(),
            difficulty: self.difficulty,
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }
}

/// A question without its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub main_topic_id: String,
    pub sub_topic_id: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub options: Vec<String>,
}

/// A quiz produced by a [`QuizGenerator`](super::QuizGenerator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub quiz_id: String,
    pub questions: Vec<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedQuiz {
    pub fn new(questions: Vec<QuestionView>, time_limit_minutes: Option<u64>) -> Self {
        Self {
            quiz_id: Uuid::new_v4().to_string(),
            questions,
            time_limit_minutes,
            created_at: Utc::now(),
        }
    }
}

/// Question counts for one sub-topic of the question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub main_topic_id: String,
    pub sub_topic_id: String,
    pub total_questions: usize,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
}

impl TopicSummary {
    /// Summarizes questions per (main topic, sub-topic), sorted by id
    pub fn summarize<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Vec<Self> {
        let mut summaries: BTreeMap<(String, String), TopicSummary> = BTreeMap::new();

        for question in questions {
            let summary = summaries
                .entry((question.main_topic_id.clone(), question.sub_topic_id.clone()))
                .or_insert_with(|| TopicSummary {
                    main_topic_id: question.main_topic_id.clone(),
                    sub_topic_id: question.sub_topic_id.clone(),
                    total_questions: 0,
                    by_difficulty: BTreeMap::new(),
                });

            summary.total_questions += 1;
            *summary.by_difficulty.entry(question.difficulty).or_insert(0) += 1;
        }

        summaries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, main: &str, sub: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.to_string(),
            main_topic_id: main.to_string(),
            sub_topic_id: sub.to_string(),
            difficulty,
            prompt: format!("Question {}", id),
            options: vec!["a".to_string(), "b".to_string()],
            correct_option: 1,
        }
    }

    #[test]
    fn test_view_hides_answer() {
        let q = question("q1", "math", "algebra", Difficulty::Easy);
        let json = serde_json::to_value(q.view()).unwrap();

        assert_eq!(json["id"], "q1");
        assert_eq!(json["subTopicId"], "algebra");
        assert!(json.get("correctOption").is_none());
    }

    #[test]
    fn test_generated_quiz_ids_are_unique() {
        let a = GeneratedQuiz::new(vec![], None);
        let b = GeneratedQuiz::new(vec![], Some(15));

        assert_ne!(a.quiz_id, b.quiz_id);
        assert!(Uuid::parse_str(&a.quiz_id).is_ok());

        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("timeLimitMinutes").is_none());
    }

    #[test]
    fn test_summarize_topics() {
        let questions = vec![
            question("q1", "math", "algebra", Difficulty::Easy),
            question("q2", "math", "algebra", Difficulty::Hard),
            question("q3", "math", "algebra", Difficulty::Easy),
            question("q4", "math", "geometry", Difficulty::Medium),
        ];

        let summaries = TopicSummary::summarize(&questions);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].sub_topic_id, "algebra");
        assert_eq!(summaries[0].total_questions, 3);
        assert_eq!(summaries[0].by_difficulty.get(&Difficulty::Easy), Some(&2));
        assert_eq!(summaries[1].sub_topic_id, "geometry");
    }
}
