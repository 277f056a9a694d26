use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A document stored by the backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub filename: String,
    /// ISO-8601 timestamp assigned by the backend.
    pub upload_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_count: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Acknowledgement returned after an upload was stored and indexed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct UploadReceipt {
    #[serde(alias = "document_id")]
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub max_results: u32,
}

/// Answer synthesized by the backend for a query.
///
/// An empty `answer` means nothing relevant was found.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    /// In `[0, 1]` when reported.
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// One backend dependency in the detailed health report.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Service specific fields such as `embedding_dimension`.
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Report from `GET /health/services`. `status` turns `degraded` as soon as
/// one service is unhealthy.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ServicesHealth {
    pub status: String,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceHealth>,
}

impl ServicesHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }

    pub fn unhealthy_services(&self) -> impl Iterator<Item = &str> {
        self.services
            .iter()
            .filter(|(_, service)| !service.is_healthy())
            .map(|(name, _)| name.as_str())
    }
}
