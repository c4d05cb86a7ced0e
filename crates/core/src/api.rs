//! JSON bodies of the cliente API.

use serde::{Deserialize, Serialize};

/// Error body returned by every failing JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason, in Spanish.
    pub error: String,
}

impl ErrorResponse {
    /// Wraps a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Delete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`; a missing record is a 404 instead.
    pub deleted: bool,
}
