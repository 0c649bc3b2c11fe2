//! API error taxonomy
//!
//! Every failed call is classified as an authorization failure (401/403), a
//! validation failure (422), a transient failure (network or 5xx) or another
//! HTTP status. The classification drives the retry policy and the way the
//! session layer reports failures.

use crate::core::api::models::HttpValidationError;

/// Error returned by the API client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authorized ({status}): {detail}")]
    Unauthorized { status: u16, detail: String },

    #[error("Validation failed: {0}")]
    Validation(HttpValidationError),

    #[error("Request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success response
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized {
                status,
                detail: extract_detail(body),
            },
            422 => match serde_json::from_slice::<HttpValidationError>(body) {
                Ok(validation) => ApiError::Validation(validation),
                Err(_) => ApiError::Status {
                    status,
                    detail: extract_detail(body),
                },
            },
            _ => ApiError::Status {
                status,
                detail: extract_detail(body),
            },
        }
    }

    /// 401 or 403: the token or the credentials are not accepted
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Network failure or server-side (5xx) failure
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Authorization, validation and decoding failures are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Status { .. })
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::Validation(_) => Some(422),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The API wraps messages as `{"detail": "..."}`; anything else is used as text.
fn extract_detail(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "no details".to_string()
    } else {
        text
    }
}
