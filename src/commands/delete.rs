use anyhow::{Context, Result};
use log::debug;

use crate::api::DocumentApi;
use crate::state::AppState;

/// Delete a document by id
#[tracing::instrument(skip(state))]
pub async fn delete<A: DocumentApi>(state: &mut AppState<A>, id: &str) -> Result<()> {
    debug!("Deleting document {}", id);

    let result = state.delete(id).await;
    if result.is_err() {
        match state.refresh_error() {
            Some(e) => eprintln!("Could not refresh document list: {}", e),
            None => println!(
                "{} document(s) on the server after refresh.",
                state.documents().len()
            ),
        }
    }
    result.with_context(|| format!("Failed to delete document {}", id))?;

    println!("Deleted document {}", id);
    Ok(())
}
