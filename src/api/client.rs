//! HTTP client for the document service with timeout, retry and error classification.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::ApiError;
use super::retry::RetryPolicy;
use super::types::{
    Document, DocumentList, HealthStatus, QueryRequest, QueryResult, ServicesHealth, UploadReceipt,
};
use crate::config::Settings;
use crate::validate::{mime_for, validate_max_results, validate_query, validate_upload};

/// Operations offered by the document service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;
    async fn upload_document(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadReceipt, ApiError>;
    async fn delete_document(&self, id: &str) -> Result<(), ApiError>;
    async fn submit_query(&self, query: &str, max_results: u32) -> Result<QueryResult, ApiError>;
    async fn health(&self) -> Result<HealthStatus, ApiError>;
    async fn services_health(&self) -> Result<ServicesHealth, ApiError>;
}

/// Client bound to one backend. Immutable once built; clone freely.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    settings: Settings,
    policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(settings: Settings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("docque/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::unexpected(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, settings))
    }

    /// Wraps an existing reqwest Client.
    pub fn with_client(client: Client, settings: Settings) -> Self {
        let policy = settings.retry_policy();
        Self {
            client,
            settings,
            policy,
        }
    }

    /// Replaces the retry policy derived from the settings.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    /// An empty final segment yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(self.settings.api_root()).map_err(|e| {
            ApiError::unexpected(format!("Invalid API URL {}: {}", self.settings.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::unexpected(format!("Invalid API URL {}", self.settings.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request built by `build` under the retry policy and returns
    /// the raw body of the first successful response.
    async fn send<B>(&self, operation_name: &str, build: B) -> Result<String, ApiError>
    where
        B: Fn(&Client) -> Result<RequestBuilder, ApiError>,
    {
        let client = &self.client;
        let build = &build;
        let timeout = self.timeout();

        self.policy
            .run(operation_name, move || async move {
                let response = build(client)?
                    .timeout(timeout)
                    .send()
                    .await
                    .map_err(|e| ApiError::from_transport(&e, timeout))?;

                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| ApiError::from_transport(&e, timeout))?;

                if !status.is_success() {
                    return Err(ApiError::from_response(status, &body));
                }

                Ok(body)
            })
            .await
    }

    async fn send_json<T, B>(&self, operation_name: &str, build: B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Fn(&Client) -> Result<RequestBuilder, ApiError>,
    {
        let body = self.send(operation_name, build).await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!("{}: undecodable response body: {}", operation_name, body);
            ApiError::unexpected(format!(
                "{}: unexpected response from server: {}",
                operation_name, e
            ))
        })
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let url = self.endpoint(&["documents", ""])?;
        debug!("Listing documents from {}...", url);

        let list: DocumentList = self
            .send_json("Listing documents", |client| Ok(client.get(url.clone())))
            .await?;

        debug!("Found {} document(s)", list.documents.len());
        Ok(list.documents)
    }

    #[tracing::instrument(skip(self, bytes))]
    async fn upload_document(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadReceipt, ApiError> {
        let mime = mime_for(filename);
        validate_upload(&self.settings, filename, &mime, bytes.len() as u64)?;

        let url = self.endpoint(&["documents", "upload"])?;
        info!("Uploading {} ({} bytes) to {}...", filename, bytes.len(), url);

        let receipt: UploadReceipt = self
            .send_json("Uploading document", |client| {
                // Forms are consumed on send, so each attempt builds its own.
                let part = Part::bytes(bytes.clone())
                    .file_name(filename.to_string())
                    .mime_str(&mime)
                    .map_err(|e| ApiError::unexpected(format!("Invalid MIME type {}: {}", mime, e)))?;
                Ok(client.post(url.clone()).multipart(Form::new().part("file", part)))
            })
            .await?;

        info!("Uploaded {} as {}", receipt.filename, receipt.id);
        Ok(receipt)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::rejected("Document id cannot be empty"));
        }

        let url = self.endpoint(&["documents", id])?;
        debug!("Deleting document at {}...", url);

        self.send("Deleting document", |client| Ok(client.delete(url.clone())))
            .await?;

        info!("Deleted document {}", id);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn submit_query(&self, query: &str, max_results: u32) -> Result<QueryResult, ApiError> {
        let query = validate_query(query, self.settings.max_query_len)?;
        validate_max_results(max_results)?;

        let url = self.endpoint(&["query", ""])?;
        let request = QueryRequest { query, max_results };
        debug!("Submitting query to {}...", url);

        self.send_json("Submitting query", |client| {
            Ok(client.post(url.clone()).json(&request))
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"])?;
        debug!("Checking health at {}...", url);

        self.send_json("Checking health", |client| Ok(client.get(url.clone())))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn services_health(&self) -> Result<ServicesHealth, ApiError> {
        let url = self.endpoint(&["health", "services"])?;
        debug!("Checking service health at {}...", url);

        self.send_json("Checking service health", |client| Ok(client.get(url.clone())))
            .await
    }
}
