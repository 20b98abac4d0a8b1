use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A well-formed error reported by the remote service through the response
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why an envelope did not yield a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error(transparent)]
    Service(#[from] ApiError),
    /// `status` was `success` but `data` was absent or null.
    #[error("success response is missing data")]
    MissingData,
}
