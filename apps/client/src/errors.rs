use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Status reported for failures that never produced an HTTP response.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Coarse classification of a failed call. Each class owns one canned, user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Network,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Timeout,
    RateLimited,
    Server,
    Unavailable,
    Unexpected,
}

impl ErrorClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => ErrorClass::Network,
            400 | 422 => ErrorClass::BadRequest,
            401 => ErrorClass::Unauthorized,
            403 => ErrorClass::Forbidden,
            404 => ErrorClass::NotFound,
            408 | 504 => ErrorClass::Timeout,
            429 => ErrorClass::RateLimited,
            500 | 502 => ErrorClass::Server,
            503 => ErrorClass::Unavailable,
            _ => ErrorClass::Unexpected,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorClass::Network => {
                "Unable to connect to the server. Please check your connection and make sure the backend is running."
            }
            ErrorClass::BadRequest => "Invalid request. Please check your input and try again.",
            ErrorClass::Unauthorized => "Unauthorized. Please sign in and try again.",
            ErrorClass::Forbidden => "Access denied. You do not have permission to perform this action.",
            ErrorClass::NotFound => "The requested resource was not found.",
            ErrorClass::Timeout => {
                "The request timed out. The server is taking too long to respond, please try again."
            }
            ErrorClass::RateLimited => "Too many requests. Please wait a moment and try again.",
            ErrorClass::Server => "Internal server error. Please try again later.",
            ErrorClass::Unavailable => {
                "Service unavailable. The server is temporarily down, please try again later."
            }
            ErrorClass::Unexpected => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Failure of a single request attempt, before any retry or translation.
#[derive(Debug, Clone, Error)]
pub enum RequestFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        detail: Option<String>,
        body: String,
    },

    #[error("could not decode response (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },
}

impl RequestFailure {
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RequestFailure::Timeout(timeout)
        } else if err.is_decode() || err.is_body() {
            RequestFailure::Decode {
                status: err.status().map(|s| s.as_u16()).unwrap_or(NO_RESPONSE_STATUS),
                reason: err.to_string(),
            }
        } else {
            RequestFailure::Network(err.to_string())
        }
    }

    /// HTTP status used for classification. Timeouts count as 408.
    pub fn status(&self) -> u16 {
        match self {
            RequestFailure::Network(_) => NO_RESPONSE_STATUS,
            RequestFailure::Timeout(_) => 408,
            RequestFailure::Status { status, .. } => *status,
            RequestFailure::Decode { status, .. } => *status,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RequestFailure::Decode { .. } => ErrorClass::Unexpected,
            other => ErrorClass::from_status(other.status()),
        }
    }
}

/// Terminal, user-presentable error of an API call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub class: ErrorClass,
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn invalid_url(path: &str, reason: impl std::fmt::Display) -> Self {
        ApiError {
            class: ErrorClass::Unexpected,
            status: NO_RESPONSE_STATUS,
            message: format!("Invalid URL '{path}': {reason}"),
        }
    }
}

impl From<RequestFailure> for ApiError {
    /// Prefers the server-supplied `detail`; falls back to the class message.
    fn from(failure: RequestFailure) -> Self {
        let class = failure.class();
        let status = failure.status();
        let message = match failure {
            RequestFailure::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail,
            _ => class.message().to_string(),
        };
        ApiError {
            class,
            status,
            message,
        }
    }
}

/// Local, pre-flight validation failure. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Error surfaced by a feature component's `submit`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("a request is already in progress")]
    Busy,
}
