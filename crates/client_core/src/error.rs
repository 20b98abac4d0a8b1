use shared::error::{ApiError, EnvelopeError};
use thiserror::Error;

/// Failure of a call to the remote resource service.
///
/// Controllers treat both variants the same way (log, report, leave domain
/// state untouched) but keep them apart so callers can word messages
/// differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("service error: {0}")]
    Service(#[from] ApiError),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Message reported by the service, if the failure came from a
    /// well-formed error envelope.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service(err) => Some(err.message.as_str()),
            Self::Transport(_) => None,
        }
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(value: EnvelopeError) -> Self {
        match value {
            EnvelopeError::Service(err) => Self::Service(err),
            EnvelopeError::MissingData => {
                Self::Transport(EnvelopeError::MissingData.to_string())
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Where a reported failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    LoadArticles,
    LoadComments,
    CreateTodo,
}

impl ErrorContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadArticles => "load_articles",
            Self::LoadComments => "load_comments",
            Self::CreateTodo => "create_todo",
        }
    }
}
