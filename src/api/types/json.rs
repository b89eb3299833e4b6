//! JSON body extractor whose rejections use the API error format

use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};
use crate::domain::quiz::{FieldViolation, ValidationReport, ViolationReason};

/// Prefix axum puts in front of every deserialization error
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Field name used when a type error concerns the body as a whole
const BODY_FIELD: &str = "body";

/// Drop-in for `axum::Json`.
///
/// Syntax errors are rejected as `json_parse_error`. A body that parses but
/// does not fit the target type is rejected as `validation_failed`, naming
/// the offending field in `violations`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(rejection_to_api_error)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let detail = err.body_text();
            let detail = detail.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&detail);
            let violation = data_error_violation(detail);

            ApiError::validation_failed(ValidationReport::new(vec![violation]))
                .with_message(format!("Invalid JSON data: {}", detail))
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::bad_request(format!("Invalid JSON syntax: {}", err.body_text()))
                .with_code("json_parse_error")
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiErrorType::InvalidRequestError,
            "Missing Content-Type header. Expected 'application/json'.",
        )
        .with_code("json_parse_error"),
        other => ApiError::new(
            other.status(),
            ApiErrorType::InvalidRequestError,
            format!("Failed to read request body: {}", other.body_text()),
        )
        .with_code("json_parse_error"),
    }
}

/// Maps `path: message` (as produced by serde) to a violation on that path
fn data_error_violation(detail: &str) -> FieldViolation {
    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            (Some(path), message)
        }
        _ => (None, detail),
    };

    if let Some(missing) = missing_field(message) {
        let field = match path {
            Some(path) => format!("{}.{}", path, missing),
            None => missing.to_string(),
        };
        return FieldViolation::new(field, ViolationReason::Required);
    }

    FieldViolation::new(path.unwrap_or(BODY_FIELD), ViolationReason::Invalid)
}

/// Field named by serde's "missing field `name`" message
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(field, _)| field)
}
