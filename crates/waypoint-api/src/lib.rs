#![forbid(unsafe_code)]
//! Wire-level contract of the Waypoint HTTP API.
//!
//! Every failure crosses the boundary as `{"error": "<message>"}` with the
//! category carried by the HTTP status; every success as a `{"success": true}`
//! envelope. The [`ApiError`] type keeps the category explicit internally so
//! handlers never pick status codes ad hoc.

mod error_mapping;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CRATE_NAME: &str = "waypoint-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    NotFound,
    AlreadyExists,
    InvalidPayload,
    InvalidType,
    TooLarge,
    CorruptData,
    Persistence,
    Internal,
}

impl ApiErrorCode {
    /// 400 for validation failures, 404 for missing targets, 500 for
    /// storage and unexpected faults.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::AlreadyExists | Self::InvalidPayload | Self::InvalidType | Self::TooLarge => 400,
            Self::CorruptData | Self::Persistence | Self::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidPayload, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    /// The body consumers see; the client surfaces `error` verbatim.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({"error": self.message})
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[must_use]
pub fn success_message(message: &str) -> Value {
    json!({"success": true, "message": message})
}
