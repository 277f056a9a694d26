//! Client for the document service, with retry logic and error classification.

mod client;
mod error;
mod retry;
mod types;

pub use client::{ApiClient, DocumentApi};
pub use error::{ApiError, ErrorKind, NO_STATUS};
pub use retry::{BASE_DELAY, DEFAULT_MAX_ATTEMPTS, RetryPolicy};
pub use types::{
    Document, DocumentList, HealthStatus, QueryRequest, QueryResult, ServiceHealth, ServicesHealth,
    UploadReceipt,
};

#[cfg(test)]
pub use client::MockDocumentApi;
