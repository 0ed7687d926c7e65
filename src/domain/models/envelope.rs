use serde::{Deserialize, Serialize};

use crate::domain::errors::ProviderError;

/// Code carried by every successful envelope
pub const CODE_SUCCESS: i32 = 0;

/// Message carried by every successful envelope
pub const MESSAGE_SUCCESS: &str = "ok";

/// Uniform `{code, message, result}` response returned by normalized operations.
///
/// `code == 0` and `message == "ok"` denote success. Any other code is the
/// provider's own error code. `result` is left out of the serialized form
/// when it is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying a result
    pub fn ok(result: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: MESSAGE_SUCCESS.to_string(),
            result: Some(result),
        }
    }

    /// Successful envelope with no result field
    pub fn ok_empty() -> Self {
        Self {
            code: CODE_SUCCESS,
            message: MESSAGE_SUCCESS.to_string(),
            result: None,
        }
    }

    /// Error envelope relaying the provider's code and message
    pub fn from_error(err: &ProviderError) -> Self {
        Self {
            code: err.code(),
            message: err.message().to_string(),
            result: None,
        }
    }

    pub fn with_result(mut self, result: T) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_SUCCESS
    }
}

/// Result fields of an upload envelope.
///
/// The fields are always present. A failed upload carries empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub hash: String,
    pub key: String,
    pub url: String,
}

impl UploadResult {
    pub fn empty() -> Self {
        Self::default()
    }
}
