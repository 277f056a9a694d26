//! Application state driven by call outcomes.
//!
//! `AppState` owns the document list and the status flags a front end
//! renders. It only changes in response to results from a [`DocumentApi`],
//! which is injected so the state logic can be exercised without a backend.

use futures_util::future::join_all;
use log::{debug, warn};

use crate::api::{ApiError, Document, DocumentApi, QueryResult, UploadReceipt};

/// A file ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of one file in a batch upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: Result<UploadReceipt, ApiError>,
}

pub struct AppState<A: DocumentApi> {
    api: A,
    documents: Vec<Document>,
    loading: bool,
    last_error: Option<ApiError>,
    last_result: Option<QueryResult>,
    refresh_error: Option<ApiError>,
}

impl<A: DocumentApi> AppState<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            documents: Vec::new(),
            loading: false,
            last_error: None,
            last_result: None,
            refresh_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    /// Failure of the most recent refresh, `None` if it succeeded.
    ///
    /// Tells whether `documents` reflects the backend after a reconciling
    /// refresh, since `last_error` keeps the error of the operation itself.
    pub fn refresh_error(&self) -> Option<&ApiError> {
        self.refresh_error.as_ref()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    fn finish<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.loading = false;
        if let Err(e) = &result {
            self.last_error = Some(e.clone());
        }
        result
    }

    /// Replaces the local list with the backend's.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.list_documents().await;
        self.refresh_error = result.as_ref().err().cloned();
        self.documents = self.finish(result)?;
        Ok(())
    }

    /// Uploads all files concurrently, then refreshes the list if any succeeded.
    ///
    /// Returns one outcome per file, in input order. The first failure, if
    /// any, is also recorded as `last_error`.
    #[tracing::instrument(skip(self, files))]
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> Vec<UploadOutcome> {
        self.begin();

        let api = &self.api;
        let outcomes = join_all(files.into_iter().map(|file| async move {
            let result = api.upload_document(file.bytes, &file.filename).await;
            UploadOutcome {
                filename: file.filename,
                result,
            }
        }))
        .await;

        self.loading = false;
        if let Some(err) = outcomes.iter().find_map(|o| o.result.as_ref().err()) {
            self.last_error = Some(err.clone());
        }

        if outcomes.iter().any(|o| o.result.is_ok()) {
            let first_error = self.last_error.take();
            if let Err(e) = self.refresh().await {
                warn!("Failed to refresh documents after upload: {}", e);
            }
            // A refresh failure must not hide an upload failure.
            if first_error.is_some() {
                self.last_error = first_error;
            }
        }

        outcomes
    }

    /// Deletes a document and drops it from the local list.
    ///
    /// On failure the list is re-fetched to reconcile with the backend and
    /// the delete error is still returned. Check [`AppState::refresh_error`]
    /// before trusting `documents` afterwards.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.delete_document(id).await;

        match self.finish(result) {
            Ok(()) => {
                self.documents.retain(|doc| doc.id != id);
                Ok(())
            }
            Err(delete_error) => {
                debug!("Delete of {} failed, refreshing document list", id);
                if let Err(e) = self.refresh().await {
                    warn!("Failed to refresh documents after failed delete: {}", e);
                }
                self.last_error = Some(delete_error.clone());
                Err(delete_error)
            }
        }
    }

    /// Submits a query and keeps the answer as `last_result`.
    #[tracing::instrument(skip(self))]
    pub async fn query(&mut self, query: &str, max_results: u32) -> Result<&QueryResult, ApiError> {
        self.begin();
        self.last_result = None;
        let result = self.api.submit_query(query, max_results).await;
        let result = self.finish(result)?;
        Ok(self.last_result.insert(result))
    }
}
