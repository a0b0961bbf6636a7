//! Uniform result record
//!
//! Every public operation answers with `{"success": true, ...fields}` or
//! `{"success": false, "error": "..."}`. Internally operations are plain
//! `Result`s; the record is only built at the boundary.

use serde::Serialize;
use std::fmt::Display;
use tracing::error;

/// Success flag plus either an operation payload or an error message
///
/// The payload is flattened, so its fields sit next to `success` in JSON.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert a `Result`, logging the error under `operation` on failure
    pub fn from_result<E: Display>(operation: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                error!("{} error: {}", operation, e);
                Self::failure(e.to_string())
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
