//! Typed failures for every backend call, classified by whether retrying can help.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Status reported for failures that never produced an HTTP response.
pub const NO_STATUS: u16 = 0;

/// How a failure should be treated by the retry loop and by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 4xx. Resubmitting the same request cannot succeed.
    Client,
    /// HTTP 5xx, connection failure or timeout. Safe to retry.
    Transient,
    /// Anything not recognised above, e.g. a success body that does not decode.
    Unexpected,
    /// Input failed local validation; nothing was sent.
    Rejected,
}

/// Failure of a single client operation.
///
/// `status` is the HTTP status of the last response seen, or [`NO_STATUS`]
/// when the request never got one (network error, timeout, local rejection).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}{}", status_suffix(.status, .message))]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub kind: ErrorKind,
}

/// `" (HTTP 404)"`, unless there is no status or the message already names it.
fn status_suffix(status: &u16, message: &str) -> String {
    if *status == NO_STATUS || message.contains(&format!("HTTP {}", status)) {
        String::new()
    } else {
        format!(" (HTTP {})", status)
    }
}

impl ApiError {
    pub fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind,
        }
    }

    pub fn client(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, status, message)
    }

    pub fn transient(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, status, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, NO_STATUS, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, NO_STATUS, message)
    }

    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Transient
    }

    /// Builds the error for a non-success response from its status and raw body.
    ///
    /// The server's `detail` field wins when it can be read; otherwise the
    /// message falls back to `HTTP {status}: {reason}`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = detail_message(body).unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });

        if status.is_client_error() {
            Self::client(status.as_u16(), message)
        } else if status.is_server_error() {
            Self::transient(status.as_u16(), message)
        } else {
            // 1xx and 3xx that reqwest did not follow
            Self::new(ErrorKind::Unexpected, status.as_u16(), message)
        }
    }

    /// Classifies a transport-level reqwest failure.
    pub fn from_transport(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::transient(
                NO_STATUS,
                format!("Request timed out after {}ms", timeout.as_millis()),
            );
        }
        if error.is_builder() {
            return Self::unexpected(format!("Failed to build request: {}", error));
        }
        if error.is_decode() {
            return Self::unexpected(format!("Failed to parse response: {}", error));
        }
        if let Some(status) = error.status() {
            return Self::from_response(status, "");
        }

        // Connection refused, reset, DNS, broken body stream...
        Self::transient(NO_STATUS, format!("Network error: {}", error))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Extracts a readable message from `{"detail": ...}`.
///
/// `detail` is a plain string for most errors and a list of
/// `{"loc": [...], "msg": "..."}` entries for request validation failures.
fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    match parsed.detail? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
