use serde::{Deserialize, Serialize};

use crate::error::{ApiError, EnvelopeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Envelope wrapping every payload the remote service returns:
/// `{"status": "success" | "error", "data": ..., "message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<T, EnvelopeError> {
        match self.status {
            ResponseStatus::Success => self.data.ok_or(EnvelopeError::MissingData),
            ResponseStatus::Error => Err(EnvelopeError::Service(ApiError::new(
                self.message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| "unknown service error".to_string()),
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListArticlesQuery {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Article, ArticleId, Todo};
    use serde::de::DeserializeOwned;

    fn decode<T: DeserializeOwned>(raw: &str) -> ApiResponse<T> {
        serde_json::from_str(raw).expect("decode")
    }

    #[test]
    fn success_envelope_yields_payload() {
        let raw = r#"{"status":"success","data":[{"id":"a1","title":"Hello","creator_name":"ann","comments_count":2}]}"#;
        let response: ApiResponse<Vec<Article>> = serde_json::from_str(raw).expect("decode");
        let articles = response.into_result().expect("success");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, ArticleId::from("a1"));
        assert_eq!(articles[0].comments_count, 2);
    }

    #[test]
    fn error_envelope_carries_server_message() {
        let raw = r#"{"status":"error","message":"article not found"}"#;
        let response: ApiResponse<Vec<Article>> = serde_json::from_str(raw).expect("decode");
        let err = response.into_result().expect_err("error status");
        assert_eq!(err, EnvelopeError::Service(ApiError::new("article not found")));
    }

    #[test]
    fn error_envelope_without_message_gets_placeholder() {
        let raw = r#"{"status":"error","data":null}"#;
        let response: ApiResponse<Vec<Article>> = serde_json::from_str(raw).expect("decode");
        let err = response.into_result().expect_err("error status");
        assert_eq!(err, EnvelopeError::Service(ApiError::new("unknown service error")));
    }

    #[test]
    fn success_without_data_is_missing_data() {
        let response: ApiResponse<Vec<Article>> = decode(r#"{"status":"success"}"#);
        assert_eq!(response.into_result(), Err(EnvelopeError::MissingData));
    }

    #[test]
    fn generic_payload_without_default_decodes_missing_data() {
        let response: ApiResponse<Todo> = decode(r#"{"status":"error","message":"nope"}"#);
        assert!(response.data.is_none());

        let created: ApiResponse<Todo> =
            decode(r#"{"status":"success","data":{"id":"t1","title":"Buy milk"}}"#);
        assert_eq!(created.into_result().expect("todo").title, "Buy milk");
    }

    #[test]
    fn create_request_serializes_title_only() {
        let body = serde_json::to_value(CreateTodoRequest {
            title: "Buy milk".into(),
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({ "title": "Buy milk" }));
    }
}
