//! Downstream response envelope (spec §6 "Downstream HTTP surface").
//!
//! Every edge-handler template returns one of these, never a stack trace:
//! `{success, data, error}` plus the status code the taxonomy in §7 maps to.

use http::StatusCode;
use serde::{Deserialize, Serialize};

use oddscache_core::CoreError;

/// `{success: bool, data: <payload>|null, error?: string}` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying a value.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful-but-empty response (spec §4.5 bootstrap: "routes will
    /// serve empty `data` with `success=true`" until a tier tick succeeds).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// A failed response. Always paired with a 4xx/5xx status via
    /// [`status_for_error`]; the message is short, never a trace (spec §7
    /// "User-visible behavior").
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Maps the §7 error taxonomy onto an HTTP status code.
///
/// `NotFound` is deliberately not pinned to 404 here: list-style endpoints
/// (T1) want an empty-data 200 instead (spec §7), so callers that know
/// they're on a details-style endpoint (T3) map `NotFound` to 404
/// themselves rather than relying on a single blanket rule.
pub fn status_for_error(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::UpstreamTransport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::UpstreamSemantic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T> From<&CoreError> for ApiResponse<T> {
    fn from(err: &CoreError) -> Self {
        ApiResponse::error(err.to_string())
    }
}
