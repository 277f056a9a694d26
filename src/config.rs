//! Configuration surface, read once at start-up and never mutated afterwards.

use std::time::Duration;

use crate::api::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_QUERY_LEN: usize = 500;
pub const DEFAULT_MAX_RESULTS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Backend root, e.g. `https://docque.example.com`.
    pub base_url: String,
    /// Hard deadline for a single attempt.
    pub timeout_ms: u64,
    /// Attempts per operation, including the first.
    pub max_attempts: u32,
    pub max_upload_bytes: u64,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
    pub allowed_mime_types: Vec<String>,
    /// In characters, after trimming.
    pub max_query_len: usize,
    pub default_max_results: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            allowed_mime_types: vec!["application/pdf".to_string(), "text/plain".to_string()],
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
    }

    /// Base URL without trailing slashes, ready for `format!("{}/path", ..)`.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
