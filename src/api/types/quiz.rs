//! Quiz API types

use serde::{Deserialize, Serialize};

use crate::domain::quiz::{
    FieldViolation, QuizAnalysisResult, TopicSummary, ValidationReport, ViolationReason,
};
use crate::infrastructure::services::AnalysisPage;

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Query parameters for `GET /v1/topics`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicsQuery {
    #[serde(default)]
    pub main_topic_id: Option<String>,
}

/// Query parameters for paginated listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageQuery {
    /// Page (1-based) and limit, or every out-of-range parameter
    pub fn resolve(&self) -> Result<(usize, usize), ValidationReport> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let mut violations = Vec::new();

        // The row offset of the page must be representable
        if page == 0 || (page - 1).checked_mul(limit).is_none() {
            violations.push(FieldViolation::new("page", ViolationReason::OutOfRange));
        }

        if limit == 0 || limit > MAX_PAGE_LIMIT {
            violations.push(FieldViolation::new("limit", ViolationReason::OutOfRange));
        }

        ValidationReport::new(violations).into_result((page, limit))
    }
}

/// Response for `GET /v1/topics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub object: String,
    pub data: Vec<TopicSummary>,
}

impl TopicsResponse {
    pub fn new(data: Vec<TopicSummary>) -> Self {
        Self {
            object: "list".to_string(),
            data,
        }
    }
}

/// Response for `GET /v1/analyses`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisListResponse {
    pub object: String,
    pub data: Vec<QuizAnalysisResult>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl From<AnalysisPage> for AnalysisListResponse {
    fn from(page: AnalysisPage) -> Self {
        Self {
            object: "list".to_string(),
            data: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        assert_eq!(PageQuery::default().resolve().unwrap(), (1, DEFAULT_PAGE_LIMIT));
    }

    #[test]
    fn test_page_query_reports_every_violation() {
        let query = PageQuery {
            page: Some(0),
            limit: Some(500),
        };

        let report = query.resolve().unwrap_err();
        assert_eq!(report.len(), 2);
        assert!(report.contains("page", ViolationReason::OutOfRange));
        assert!(report.contains("limit", ViolationReason::OutOfRange));
    }

    #[test]
    fn test_page_query_rejects_unreachable_page() {
        let query = PageQuery {
            page: Some(usize::MAX),
            limit: Some(2),
        };

        let report = query.resolve().unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(report.contains("page", ViolationReason::OutOfRange));
    }

    #[test]
    fn test_topics_query_camel_case() {
        let query: TopicsQuery =
            serde_json::from_value(serde_json::json!({"mainTopicId": "math"})).unwrap();
        assert_eq!(query.main_topic_id.as_deref(), Some("math"));
    }

    #[test]
    fn test_analysis_list_response_from_page() {
        let response = AnalysisListResponse::from(AnalysisPage {
            items: Vec::new(),
            total: 3,
            page: 2,
            limit: 1,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["object"], "list");
        assert_eq!(json["total"], 3);
        assert_eq!(json["page"], 2);
    }
}
