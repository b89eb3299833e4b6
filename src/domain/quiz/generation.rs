//! Quiz generation requests and their validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::difficulty::{validate_difficulty, Difficulty};
use super::validation::{FieldViolation, ValidationReport, ViolationReason};

/// Smallest number of questions a quiz may have
pub const MIN_QUESTION_COUNT: u32 = 1;
/// Largest number of questions a quiz may have
pub const MAX_QUESTION_COUNT: u32 = 50;
/// Question count used when the request omits it
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Quiz options as received from the caller, before validation
///
/// Every field is optional; omitted fields take their defaults when merged
/// into [`QuizGenerationOptions`]. A field sent with the wrong JSON type is
/// left unset and recorded in `mistyped`, so it is reported alongside the
/// other violations instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", from = "UncheckedOptions")]
pub struct RawQuizGenerationOptions {
    #[validate(range(min = 1, max = 50, code = "out_of_range"))]
    pub question_count: Option<i64>,

    #[validate(custom(function = "validate_difficulty"))]
    pub difficulty: Option<String>,

    #[validate(range(min = 1, code = "out_of_range"))]
    pub time_limit_minutes: Option<i64>,

    pub randomize: Option<bool>,

    pub prioritize_weak_topics: Option<bool>,

    #[serde(skip)]
    pub mistyped: Vec<FieldViolation>,
}

/// Options exactly as sent, before any type checks
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedOptions {
    question_count: Option<Value>,
    difficulty: Option<Value>,
    time_limit_minutes: Option<Value>,
    randomize: Option<Value>,
    prioritize_weak_topics: Option<Value>,
}

impl From<UncheckedOptions> for RawQuizGenerationOptions {
    fn from(unchecked: UncheckedOptions) -> Self {
        let mut mistyped = Vec::new();

        let question_count = typed(
            &mut mistyped,
            "questionCount",
            ViolationReason::OutOfRange,
            unchecked.question_count,
            integer,
        );
        let difficulty = typed(
            &mut mistyped,
            "difficulty",
            ViolationReason::InvalidEnum,
            unchecked.difficulty,
            |v| v.as_str().map(str::to_string),
        );
        let time_limit_minutes = typed(
            &mut mistyped,
            "timeLimitMinutes",
            ViolationReason::OutOfRange,
            unchecked.time_limit_minutes,
            integer,
        );
        let randomize = typed(
            &mut mistyped,
            "randomize",
            ViolationReason::Invalid,
            unchecked.randomize,
            Value::as_bool,
        );
        let prioritize_weak_topics = typed(
            &mut mistyped,
            "prioritizeWeakTopics",
            ViolationReason::Invalid,
            unchecked.prioritize_weak_topics,
            Value::as_bool,
        );

        Self {
            question_count,
            difficulty,
            time_limit_minutes,
            randomize,
            prioritize_weak_topics,
            mistyped,
        }
    }
}

/// Converts a present value, recording a violation when it has the wrong type
fn typed<T>(
    mistyped: &mut Vec<FieldViolation>,
    field: &str,
    reason: ViolationReason,
    value: Option<Value>,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = value?;
    let converted = convert(&value);

    if converted.is_none() {
        mistyped.push(FieldViolation::new(field, reason));
    }

    converted
}

/// Integral JSON number (`10` or `10.0`); fractions and non-numbers yield `None`
fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }

    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

fn validate_sub_topic_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Validated, immutable quiz options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGenerationOptions {
    question_count: u32,
    difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_limit_minutes: Option<u64>,
    randomize: bool,
    prioritize_weak_topics: bool,
}

impl Default for QuizGenerationOptions {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            difficulty: Difficulty::Medium,
            time_limit_minutes: None,
            randomize: true,
            prioritize_weak_topics: true,
        }
    }
}

impl QuizGenerationOptions {
    /// Validates raw options and merges them over the defaults
    ///
    /// All violations are reported together.
    pub fn validate(raw: &RawQuizGenerationOptions) -> Result<Self, ValidationReport> {
        let mut report = ValidationReport::new(raw.mistyped.clone());

        if let Err(errors) = raw.validate() {
            report = report.merge(ValidationReport::from_errors(&errors, None));
        }

        report.into_result(Self::default().merge(raw))
    }

    /// Copy-on-build: returns a new value with the fields present in `partial` applied
    ///
    /// Values in `partial` are expected to be valid; out-of-range values are
    /// clamped and unknown difficulties ignored.
    pub fn merge(self, partial: &RawQuizGenerationOptions) -> Self {
        let question_count = partial
            .question_count
            .map(|c| c.clamp(MIN_QUESTION_COUNT as i64, MAX_QUESTION_COUNT as i64) as u32)
            .unwrap_or(self.question_count);

        let difficulty = partial
            .difficulty
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(self.difficulty);

        let time_limit_minutes = match partial.time_limit_minutes {
            Some(minutes) if minutes >= 1 => Some(minutes as u64),
            Some(_) => self.time_limit_minutes,
            None => self.time_limit_minutes,
        };

        Self {
            question_count,
            difficulty,
            time_limit_minutes,
            randomize: partial.randomize.unwrap_or(self.randomize),
            prioritize_weak_topics: partial
                .prioritize_weak_topics
                .unwrap_or(self.prioritize_weak_topics),
        }
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn time_limit_minutes(&self) -> Option<u64> {
        self.time_limit_minutes
    }

    pub fn randomize(&self) -> bool {
        self.randomize
    }

    pub fn prioritize_weak_topics(&self) -> bool {
        self.prioritize_weak_topics
    }
}

/// Which topic (and optionally which sub-topics) a quiz should cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicSelection {
    #[validate(length(min = 1, code = "required"))]
    pub main_topic_id: String,

    #[serde(default)]
    #[validate(custom(function = "validate_sub_topic_ids"))]
    pub sub_topic_ids: Vec<String>,
}

impl TopicSelection {
    pub fn new(main_topic_id: impl Into<String>) -> Self {
        Self {
            main_topic_id: main_topic_id.into(),
            sub_topic_ids: Vec::new(),
        }
    }

    pub fn with_sub_topics<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_topic_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a question in the given topic/sub-topic falls into this selection
    pub fn covers(&self, main_topic_id: &str, sub_topic_id: &str) -> bool {
        self.main_topic_id == main_topic_id
            && (self.sub_topic_ids.is_empty() || self.sub_topic_ids.iter().any(|s| s == sub_topic_id))
    }
}

/// Quiz generation request as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizGenerationRequest {
    #[serde(default)]
    pub topics: Option<TopicSelection>,
    #[serde(default)]
    pub options: RawQuizGenerationOptions,
}

/// A validated quiz generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGenerationRequest {
    topics: Option<TopicSelection>,
    options: QuizGenerationOptions,
}

impl QuizGenerationRequest {
    pub fn new(topics: Option<TopicSelection>, options: QuizGenerationOptions) -> Self {
        Self { topics, options }
    }

    /// Validates the topic selection and the options, collecting every violation
    ///
    /// Option fields are reported by name (`questionCount`), topic selection
    /// fields under `topics.` (`topics.mainTopicId`).
    pub fn validate(raw: &RawQuizGenerationRequest) -> Result<Self, ValidationReport> {
        let mut report = ValidationReport::default();

        if let Some(topics) = &raw.topics {
            if let Err(errors) = topics.validate() {
                report = report.merge(ValidationReport::from_errors(&errors, Some("topics")));
            }
        }

        let options = match QuizGenerationOptions::validate(&raw.options) {
            Ok(options) => options,
            Err(options_report) => {
                report = report.merge(options_report);
                QuizGenerationOptions::default()
            }
        };

        report.into_result(Self {
            topics: raw.topics.clone(),
            options,
        })
    }

    pub fn topics(&self) -> Option<&TopicSelection> {
        self.topics.as_ref()
    }

    pub fn options(&self) -> &QuizGenerationOptions {
        &self.options
    }
}
