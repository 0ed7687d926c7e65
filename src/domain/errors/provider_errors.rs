use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque error object returned by the storage provider.
///
/// The facade never interprets the code; it is relayed to callers as-is,
/// either inside an [`Envelope`](crate::domain::models::Envelope) or as the
/// error half of a raw manager result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    code: i32,
    message: String,
}

impl ProviderError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Numeric provider code (an HTTP-like status such as 612)
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for every remote provider call
pub type ProviderResult<T> = Result<T, ProviderError>;
