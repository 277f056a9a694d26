use anyhow::{Context, Result};
use log::debug;

use crate::api::{Document, DocumentApi};
use crate::state::AppState;

/// List all uploaded documents
#[tracing::instrument(skip(state))]
pub async fn list<A: DocumentApi>(state: &mut AppState<A>) -> Result<()> {
    state
        .refresh()
        .await
        .context("Failed to list documents")?;

    debug!("Found {} document(s)", state.documents().len());

    for line in format_documents(state.documents()) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per document: id, file name, upload date.
pub(crate) fn format_documents(documents: &[Document]) -> Vec<String> {
    if documents.is_empty() {
        return vec!["No documents uploaded.".to_string()];
    }

    let id_width = documents.iter().map(|d| d.id.len()).max().unwrap_or(0);
    let name_width = documents.iter().map(|d| d.filename.len()).max().unwrap_or(0);

    documents
        .iter()
        .map(|doc| {
            format!(
                "{:<id_width$}  {:<name_width$}  {}",
                doc.id,
                doc.filename,
                doc.upload_date,
                id_width = id_width,
                name_width = name_width
            )
        })
        .collect()
}
