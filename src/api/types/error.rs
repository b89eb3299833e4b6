//! API error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::quiz::{FieldViolation, ValidationReport};

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Every field violation found in the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                    violations: None,
                },
            },
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.response.error.message = message.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// 400 listing every violation of the request
    pub fn validation_failed(report: ValidationReport) -> Self {
        let mut error = Self::bad_request(format!("Request validation failed: {}", report))
            .with_code("validation_failed");

        if let [single] = report.violations() {
            error = error.with_param(single.field.clone());
        }

        error.response.error.violations = Some(report.violations().to_vec());
        error
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidInput(report) => Self::validation_failed(report),
            DomainError::Configuration { message } => Self::internal(message),
            DomainError::Internal { message } => Self::internal(message),
            DomainError::Cache { message } => Self::unavailable(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quiz::ViolationReason;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Malformed body");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.message, "Malformed body");
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::not_found("Analysis for quiz 'q-1'").into();

        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.response.error.error_type, ApiErrorType::NotFoundError);
    }

    #[test]
    fn test_invalid_input_lists_all_violations() {
        let report = ValidationReport::new(vec![
            FieldViolation::new("questionCount", ViolationReason::OutOfRange),
            FieldViolation::new("difficulty", ViolationReason::InvalidEnum),
        ]);

        let api_err: ApiError = DomainError::invalid_input(report).into();
        let json = serde_json::to_value(&api_err.response).unwrap();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_failed");
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert!(json["error"].get("param").is_none());
        assert_eq!(
            json["error"]["violations"],
            serde_json::json!([
                {"field": "difficulty", "reason": "invalid_enum"},
                {"field": "questionCount", "reason": "out_of_range"}
            ])
        );
    }

    #[test]
    fn test_single_violation_sets_param() {
        let report = ValidationReport::new(vec![FieldViolation::new(
            "questionCount",
            ViolationReason::OutOfRange,
        )]);

        let api_err = ApiError::validation_failed(report);
        assert_eq!(api_err.response.error.param.as_deref(), Some("questionCount"));
    }

    #[test]
    fn test_plain_errors_omit_violations() {
        let json = serde_json::to_string(&ApiError::internal("boom").response).unwrap();

        assert!(json.contains("server_error"));
        assert!(!json.contains("violations"));
    }
}
