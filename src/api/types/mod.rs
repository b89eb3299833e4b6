//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod quiz;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use quiz::{AnalysisListResponse, PageQuery, TopicsQuery, TopicsResponse};
