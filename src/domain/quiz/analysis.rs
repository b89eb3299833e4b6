//! Quiz analysis results
//!
//! Per-topic and per-difficulty statistics of a finished quiz are aggregated
//! into a [`QuizAnalysisResult`]. Topics are partitioned into strong, medium
//! and weak by their correctness rate (see [`ScoreBand`]).

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::difficulty::{validate_difficulty, Difficulty};
use super::score::ScoreBand;
use super::validation::{FieldViolation, ValidationReport, ViolationReason};

/// Correctness statistics for one sub-topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPerformance {
    pub sub_topic: String,
    pub normalized_sub_topic: String,
    pub correct_rate: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
}

impl TopicPerformance {
    /// Creates a performance entry with the rate derived from the counts
    pub fn new(sub_topic: impl Into<String>, total_questions: u32, correct_answers: u32) -> Self {
        let sub_topic = sub_topic.into();
        Self {
            normalized_sub_topic: normalize_topic_name(&sub_topic),
            sub_topic,
            correct_rate: rate(correct_answers, total_questions),
            total_questions,
            correct_answers,
        }
    }

    /// Overrides the derived rate
    pub fn with_rate(mut self, correct_rate: f64) -> Self {
        self.correct_rate = correct_rate;
        self
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_rate(self.correct_rate)
    }
}

/// Correctness statistics for one difficulty level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyPerformance {
    pub difficulty: Difficulty,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub correct_rate: f64,
}

impl DifficultyPerformance {
    pub fn new(difficulty: Difficulty, total_questions: u32, correct_answers: u32) -> Self {
        Self {
            difficulty,
            total_questions,
            correct_answers,
            correct_rate: rate(correct_answers, total_questions),
        }
    }
}

/// Aggregated report for one quiz attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnalysisResult {
    pub quiz_id: String,
    pub overall_score: f64,
    pub strong_topics: Vec<TopicPerformance>,
    pub medium_topics: Vec<TopicPerformance>,
    pub weak_topics: Vec<TopicPerformance>,
    pub difficulty_breakdown: Vec<DifficultyPerformance>,
    pub recommendations: Vec<String>,
    pub key_insights: Vec<String>,
    pub timestamp: String,
}

impl QuizAnalysisResult {
    /// Builds a result from topic and difficulty statistics, stamped with the current time
    pub fn build(
        quiz_id: impl Into<String>,
        topics: Vec<TopicPerformance>,
        difficulties: Vec<DifficultyPerformance>,
    ) -> Self {
        QuizAnalysisBuilder::new(quiz_id)
            .topics(topics)
            .difficulties(difficulties)
            .build()
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }

    /// All topics regardless of partition
    pub fn topics(&self) -> impl Iterator<Item = &TopicPerformance> {
        self.strong_topics
            .iter()
            .chain(self.medium_topics.iter())
            .chain(self.weak_topics.iter())
    }
}

/// Builder for [`QuizAnalysisResult`]
#[derive(Debug, Clone, Default)]
pub struct QuizAnalysisBuilder {
    quiz_id: String,
    topics: Vec<TopicPerformance>,
    difficulties: Vec<DifficultyPerformance>,
    recommendations: Vec<String>,
    key_insights: Vec<String>,
    timestamp: Option<Value>,
}

impl QuizAnalysisBuilder {
    pub fn new(quiz_id: impl Into<String>) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            ..Default::default()
        }
    }

    pub fn topics(mut self, topics: Vec<TopicPerformance>) -> Self {
        self.topics = topics;
        self
    }

    pub fn difficulties(mut self, difficulties: Vec<DifficultyPerformance>) -> Self {
        self.difficulties = difficulties;
        self
    }

    pub fn recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn key_insights(mut self, key_insights: Vec<String>) -> Self {
        self.key_insights = key_insights;
        self
    }

    /// Caller supplied timestamp, normalized on build
    pub fn timestamp(mut self, timestamp: Option<Value>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> QuizAnalysisResult {
        self.build_at(Utc::now())
    }

    /// Builds the result, using `now` when no usable timestamp was supplied
    pub fn build_at(self, now: DateTime<Utc>) -> QuizAnalysisResult {
        let overall_score = overall_score(&self.topics);
        let timestamp = normalize_timestamp(self.timestamp.as_ref(), now);

        let mut strong_topics = Vec::new();
        let mut medium_topics = Vec::new();
        let mut weak_topics = Vec::new();

        for topic in self.topics {
            match topic.band() {
                ScoreBand::Mastered => strong_topics.push(topic),
                ScoreBand::Medium => medium_topics.push(topic),
                ScoreBand::Failed => weak_topics.push(topic),
            }
        }

        QuizAnalysisResult {
            quiz_id: self.quiz_id,
            overall_score,
            strong_topics,
            medium_topics,
            weak_topics,
            difficulty_breakdown: self.difficulties,
            recommendations: self.recommendations,
            key_insights: self.key_insights,
            timestamp,
        }
    }
}

/// Topic statistics as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RawTopicPerformance {
    #[validate(length(min = 1, code = "required"))]
    pub sub_topic: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[validate(range(min = 0.0, max = 1.0, code = "out_of_range"))]
    pub correct_rate: Option<f64>,
}

/// Difficulty statistics as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RawDifficultyPerformance {
    #[validate(custom(function = "validate_difficulty"))]
    pub difficulty: String,
    pub total_questions: u32,
    pub correct_answers: u32,
}

/// Analysis submission for a quiz, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizAnalysis {
    #[serde(default)]
    #[validate(nested)]
    pub topics: Vec<RawTopicPerformance>,
    #[serde(default)]
    #[validate(nested)]
    pub difficulties: Vec<RawDifficultyPerformance>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub key_insights: Vec<String>,
    /// RFC 3339 string, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` or epoch milliseconds
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl RawQuizAnalysis {
    /// Validates the submission and turns it into a builder for `quiz_id`
    pub fn into_builder(self, quiz_id: impl Into<String>) -> Result<QuizAnalysisBuilder, ValidationReport> {
        let mut report = match self.validate() {
            Ok(()) => ValidationReport::default(),
            Err(errors) => ValidationReport::from_errors(&errors, None),
        };

        for (index, topic) in self.topics.iter().enumerate() {
            if topic.correct_answers > topic.total_questions {
                report.push(FieldViolation::new(
                    format!("topics[{}].correctAnswers", index),
                    ViolationReason::OutOfRange,
                ));
            }
        }
        for (index, entry) in self.difficulties.iter().enumerate() {
            if entry.correct_answers > entry.total_questions {
                report.push(FieldViolation::new(
                    format!("difficulties[{}].correctAnswers", index),
                    ViolationReason::OutOfRange,
                ));
            }
        }

        if !report.is_empty() {
            return Err(report);
        }

        let topics = self
            .topics
            .into_iter()
            .map(|t| {
                let performance = TopicPerformance::new(t.sub_topic, t.total_questions, t.correct_answers);
                match t.correct_rate {
                    Some(rate) => performance.with_rate(rate),
                    None => performance,
                }
            })
            .collect();

        let mut difficulties = Vec::with_capacity(self.difficulties.len());
        for entry in self.difficulties {
            // Already validated above
            if let Ok(difficulty) = entry.difficulty.parse::<Difficulty>() {
                difficulties.push(DifficultyPerformance::new(
                    difficulty,
                    entry.total_questions,
                    entry.correct_answers,
                ));
            }
        }

        Ok(QuizAnalysisBuilder::new(quiz_id)
            .topics(topics)
            .difficulties(difficulties)
            .recommendations(self.recommendations)
            .key_insights(self.key_insights)
            .timestamp(self.timestamp))
    }
}

/// 100 x correct / total over all topics, or 0 when there were no questions
pub fn overall_score(topics: &[TopicPerformance]) -> f64 {
    let (correct, total) = topics.iter().fold((0u64, 0u64), |(c, t), topic| {
        (c + topic.correct_answers as u64, t + topic.total_questions as u64)
    });

    if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    }
}

fn rate(correct: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Normalizes a topic name for matching: `" Linear Algebra (II) "` -> `"linear-algebra-ii"`
pub fn normalize_topic_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !normalized.is_empty() {
                normalized.push('-');
            }
            pending_dash = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    normalized
}

/// Normalizes a caller supplied timestamp to RFC 3339 (UTC, millisecond precision)
///
/// Falls back to `now` for missing or unparseable values.
pub fn normalize_timestamp(value: Option<&Value>, now: DateTime<Utc>) -> String {
    value
        .and_then(parse_timestamp)
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

/// Offset-less date-times, read as UTC
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
    {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_partition_boundaries() {
        let result = QuizAnalysisBuilder::new("quiz-1")
            .topics(vec![
                TopicPerformance::new("Exactly Strong", 10, 7).with_rate(0.70),
                TopicPerformance::new("Exactly Medium", 10, 5).with_rate(0.50),
                TopicPerformance::new("Just Weak", 10, 5).with_rate(0.499999),
            ])
            .build_at(fixed_now());

        assert_eq!(result.strong_topics.len(), 1);
        assert_eq!(result.strong_topics[0].sub_topic, "Exactly Strong");
        assert_eq!(result.medium_topics.len(), 1);
        assert_eq!(result.medium_topics[0].sub_topic, "Exactly Medium");
        assert_eq!(result.weak_topics.len(), 1);
        assert_eq!(result.weak_topics[0].sub_topic, "Just Weak");
    }

    #[test]
    fn test_overall_score_and_partition() {
        let result = QuizAnalysisBuilder::new("quiz-1")
            .topics(vec![
                TopicPerformance::new("Algebra", 5, 4).with_rate(0.8),
                TopicPerformance::new("Geometry", 5, 2).with_rate(0.4),
            ])
            .build_at(fixed_now());

        assert!((result.overall_score - 60.0).abs() < 1e-9);
        assert_eq!(result.strong_topics[0].sub_topic, "Algebra");
        assert_eq!(result.weak_topics[0].sub_topic, "Geometry");
        assert!(result.medium_topics.is_empty());
        assert_eq!(result.band(), ScoreBand::Medium);
    }

    #[test]
    fn test_every_topic_in_exactly_one_partition() {
        let topics: Vec<_> = (0..=10)
            .map(|correct| TopicPerformance::new(format!("topic {}", correct), 10, correct))
            .collect();

        let result = QuizAnalysisBuilder::new("quiz-1")
            .topics(topics.clone())
            .build_at(fixed_now());

        assert_eq!(result.topics().count(), topics.len());
        for topic in &topics {
            assert_eq!(result.topics().filter(|t| *t == topic).count(), 1);
        }
    }

    #[test]
    fn test_empty_topics_score_zero() {
        let result = QuizAnalysisBuilder::new("quiz-1").build_at(fixed_now());

        assert_eq!(result.overall_score, 0.0);
        assert!(result.topics().next().is_none());

        let zero_questions = vec![TopicPerformance::new("Empty", 0, 0)];
        assert_eq!(overall_score(&zero_questions), 0.0);
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = QuizAnalysisBuilder::new("quiz-1")
            .topics(vec![
                TopicPerformance::new("Algebra", 8, 6),
                TopicPerformance::new("Geometry", 4, 1),
            ])
            .difficulties(vec![DifficultyPerformance::new(Difficulty::Easy, 12, 7)])
            .timestamp(Some(Value::String("2024-01-15".to_string())));

        let first = builder.clone().build_at(fixed_now());
        let second = builder.build_at(fixed_now());

        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_topic_name() {
        assert_eq!(normalize_topic_name(" Linear Algebra (II) "), "linear-algebra-ii");
        assert_eq!(normalize_topic_name("World_War--1"), "world-war-1");
        assert_eq!(normalize_topic_name("algebra"), "algebra");
        assert_eq!(normalize_topic_name("  "), "");
    }

    #[test]
    fn test_normalize_timestamp_formats() {
        let now = fixed_now();

        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15T10:30:00+02:00".into())), now),
            "2024-01-15T08:30:00.000Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15 10:30:00".into())), now),
            "2024-01-15T10:30:00.000Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15".into())), now),
            "2024-01-15T00:00:00.000Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&serde_json::json!(1_705_314_600_000i64)), now),
            "2024-01-15T10:30:00.000Z"
        );
    }

    #[test]
    fn test_normalize_timestamp_without_offset_is_utc() {
        let now = fixed_now();

        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15T10:30:00".into())), now),
            "2024-01-15T10:30:00.000Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15T10:30:00.123".into())), now),
            "2024-01-15T10:30:00.123Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15 10:30:00.5".into())), now),
            "2024-01-15T10:30:00.500Z"
        );
        assert_eq!(
            normalize_timestamp(Some(&Value::String("2024-01-15T10:30".into())), now),
            "2024-01-15T10:30:00.000Z"
        );
    }

    #[test]
    fn test_normalize_timestamp_falls_back_to_now() {
        let now = fixed_now();
        let expected = "2024-03-01T12:00:00.000Z";

        assert_eq!(normalize_timestamp(None, now), expected);
        assert_eq!(
            normalize_timestamp(Some(&Value::String("last tuesday".into())), now),
            expected
        );
        assert_eq!(normalize_timestamp(Some(&Value::Bool(true)), now), expected);
    }

    #[test]
    fn test_raw_analysis_computes_missing_rate() {
        let raw: RawQuizAnalysis = serde_json::from_value(serde_json::json!({
            "topics": [
                {"subTopic": "Algebra", "totalQuestions": 4, "correctAnswers": 3},
                {"subTopic": "Geometry", "totalQuestions": 5, "correctAnswers": 1, "correctRate": 0.2}
            ],
            "difficulties": [{"difficulty": "easy", "totalQuestions": 9, "correctAnswers": 4}],
            "recommendations": ["Review triangles"],
            "keyInsights": ["Strong on equations"]
        }))
        .unwrap();

        let result = raw.into_builder("quiz-7").unwrap().build_at(fixed_now());

        assert_eq!(result.quiz_id, "quiz-7");
        assert_eq!(result.strong_topics[0].correct_rate, 0.75);
        assert_eq!(result.strong_topics[0].normalized_sub_topic, "algebra");
        assert_eq!(result.weak_topics[0].correct_rate, 0.2);
        assert_eq!(result.difficulty_breakdown[0].difficulty, Difficulty::Easy);
        assert_eq!(result.recommendations, vec!["Review triangles".to_string()]);
        assert_eq!(result.timestamp, "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_raw_analysis_collects_violations() {
        let raw: RawQuizAnalysis = serde_json::from_value(serde_json::json!({
            "topics": [
                {"subTopic": "Algebra", "totalQuestions": 4, "correctAnswers": 5},
                {"subTopic": "Geometry", "totalQuestions": 5, "correctAnswers": 1, "correctRate": 1.5}
            ],
            "difficulties": [{"difficulty": "extreme", "totalQuestions": 1, "correctAnswers": 0}]
        }))
        .unwrap();

        let report = raw.into_builder("quiz-7").unwrap_err();

        assert!(report.contains("topics[0].correctAnswers", ViolationReason::OutOfRange));
        assert!(report.contains("topics[1].correctRate", ViolationReason::OutOfRange));
        assert!(report.contains("difficulties[0].difficulty", ViolationReason::InvalidEnum));
        assert_eq!(report.len(), 3);
    }
}
