use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Article, ArticleId, Comment, Todo},
    protocol::{ApiResponse, CreateTodoRequest, ListArticlesQuery},
};
use tracing::debug;
use url::Url;

pub mod error;
pub mod feed;
pub mod todo_form;
pub mod view;

pub use error::{ClientError, ErrorContext};
pub use feed::{ExpandOutcome, FeedController, FeedSnapshot, LoadOutcome, PAGE_SIZE};
pub use todo_form::{
    validate_title, FormField, SubmitOutcome, TitleValidation, TodoFormController,
    TodoFormSnapshot,
};

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Remote API the view controllers are built on.
#[async_trait]
pub trait ResourceService: Send + Sync {
    async fn list_articles(&self, limit: u32, offset: u32) -> Result<Vec<Article>>;
    async fn list_comments(&self, article_id: &ArticleId) -> Result<Vec<Comment>>;
    async fn create_todo(&self, title: &str) -> Result<Todo>;
}

/// Notifications emitted by controllers. `Error` is the operator-visible
/// failure channel; every service or transport failure is sent here after it
/// has been logged.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    ArticlesAppended {
        offset: u32,
        added: usize,
    },
    CommentsLoaded {
        article_id: ArticleId,
        count: usize,
    },
    TodoCreated(Todo),
    Error {
        context: ErrorContext,
        message: String,
    },
}

/// [`ResourceService`] over HTTP. Every response body is the
/// `{status, data, message}` envelope.
pub struct HttpResourceService {
    http: Client,
    base_url: String,
}

impl HttpResourceService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            ClientError::transport(format!("invalid base url {}: {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::transport(format!("base url cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(envelope) => Ok(envelope.into_result()?),
        Err(err) if !status.is_success() => Err(ClientError::transport(format!(
            "unexpected HTTP status {status}: {err}"
        ))),
        Err(err) => Err(ClientError::transport(format!(
            "malformed response body: {err}"
        ))),
    }
}

#[async_trait]
impl ResourceService for HttpResourceService {
    async fn list_articles(&self, limit: u32, offset: u32) -> Result<Vec<Article>> {
        let url = self.endpoint(&["articles"])?;
        debug!(%url, limit, offset, "http: listing articles");
        let response = self
            .http
            .get(url)
            .query(&ListArticlesQuery { limit, offset })
            .send()
            .await?;
        decode_envelope(response).await
    }

    async fn list_comments(&self, article_id: &ArticleId) -> Result<Vec<Comment>> {
        let url = self.endpoint(&["articles", article_id.as_str(), "comments"])?;
        debug!(%url, "http: listing comments");
        let response = self.http.get(url).send().await?;
        decode_envelope(response).await
    }

    async fn create_todo(&self, title: &str) -> Result<Todo> {
        let url = self.endpoint(&["todos"])?;
        debug!(%url, "http: creating todo");
        let response = self
            .http
            .post(url)
            .json(&CreateTodoRequest {
                title: title.to_string(),
            })
            .send()
            .await?;
        decode_envelope(response).await
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
