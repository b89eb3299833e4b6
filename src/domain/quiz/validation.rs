//! Field-level validation reports
//!
//! Violations are collected rather than returned fail-fast, so a caller sees
//! every problem with a request in one response.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Machine-readable reason for a field violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    /// Numeric value outside its allowed range
    OutOfRange,
    /// Value is not one of the enumerated options
    InvalidEnum,
    /// Required value is missing or empty
    Required,
    /// Any other rule
    Invalid,
}

impl ViolationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnum => "invalid_enum",
            Self::Required => "required",
            Self::Invalid => "invalid",
        }
    }

    /// Maps a `validator` error code onto a reason
    pub fn from_code(code: &str) -> Self {
        match code {
            "out_of_range" | "range" => Self::OutOfRange,
            "invalid_enum" => Self::InvalidEnum,
            "required" => Self::Required,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation on a named field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: ViolationReason,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// All violations found while validating one input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Creates a report; violations are kept sorted by field
    pub fn new(mut violations: Vec<FieldViolation>) -> Self {
        violations.sort();
        violations.dedup();
        Self { violations }
    }

    /// Converts `validator` errors, prefixing field paths with `prefix` when given
    pub fn from_errors(errors: &ValidationErrors, prefix: Option<&str>) -> Self {
        let mut violations = Vec::new();
        collect(errors, prefix.unwrap_or_default(), &mut violations);
        Self::new(violations)
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether the report lists the given field/reason pair
    pub fn contains(&self, field: &str, reason: ViolationReason) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.reason == reason)
    }

    /// Adds all violations of another report
    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.violations.extend(other.violations);
        Self::new(self.violations)
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
        self.violations.sort();
        self.violations.dedup();
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationReport> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.reason))
            .collect();

        write!(f, "{}", parts.join(", "))
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(&field.to_string()));

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(FieldViolation::new(
                        path.clone(),
                        ViolationReason::from_code(&error.code),
                    ));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// `question_count` -> `questionCount`
pub(crate) fn camel_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut upper_next = false;

    for c in field.chars() {
        if c == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("question_count"), "questionCount");
        assert_eq!(camel_case("prioritize_weak_topics"), "prioritizeWeakTopics");
        assert_eq!(camel_case("difficulty"), "difficulty");
        assert_eq!(camel_case("_leading"), "leading");
    }

    #[test]
    fn test_reason_from_code() {
        assert_eq!(ViolationReason::from_code("out_of_range"), ViolationReason::OutOfRange);
        assert_eq!(ViolationReason::from_code("range"), ViolationReason::OutOfRange);
        assert_eq!(ViolationReason::from_code("invalid_enum"), ViolationReason::InvalidEnum);
        assert_eq!(ViolationReason::from_code("required"), ViolationReason::Required);
        assert_eq!(ViolationReason::from_code("length"), ViolationReason::Invalid);
    }

    #[test]
    fn test_from_errors_collects_all_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("question_count", ValidationError::new("out_of_range"));
        errors.add("difficulty", ValidationError::new("invalid_enum"));

        let report = ValidationReport::from_errors(&errors, None);

        assert_eq!(report.len(), 2);
        assert!(report.contains("questionCount", ViolationReason::OutOfRange));
        assert!(report.contains("difficulty", ViolationReason::InvalidEnum));
    }

    #[test]
    fn test_from_errors_with_prefix() {
        let mut errors = ValidationErrors::new();
        errors.add("main_topic_id", ValidationError::new("required"));

        let report = ValidationReport::from_errors(&errors, Some("topics"));
        assert!(report.contains("topics.mainTopicId", ViolationReason::Required));
    }

    #[test]
    fn test_report_is_sorted_and_displayable() {
        let report = ValidationReport::new(vec![
            FieldViolation::new("questionCount", ViolationReason::OutOfRange),
            FieldViolation::new("difficulty", ViolationReason::InvalidEnum),
        ]);

        assert_eq!(
            report.to_string(),
            "difficulty: invalid_enum, questionCount: out_of_range"
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationReport::default().into_result(5), Ok(5));

        let report = ValidationReport::new(vec![FieldViolation::new(
            "questionCount",
            ViolationReason::OutOfRange,
        )]);
        assert!(report.into_result(5).is_err());
    }

    #[test]
    fn test_violation_serialization() {
        let violation = FieldViolation::new("questionCount", ViolationReason::OutOfRange);
        let json = serde_json::to_string(&violation).unwrap();

        assert_eq!(json, r#"{"field":"questionCount","reason":"out_of_range"}"#);
    }
}
