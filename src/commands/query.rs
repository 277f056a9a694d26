use anyhow::{Context, Result};

use crate::api::{DocumentApi, QueryResult};
use crate::state::AppState;

/// Ask a question about the uploaded documents
#[tracing::instrument(skip(state))]
pub async fn query<A: DocumentApi>(
    state: &mut AppState<A>,
    text: &str,
    max_results: u32,
) -> Result<()> {
    let result = state
        .query(text, max_results)
        .await
        .context("Failed to submit query")?;

    for line in format_query_result(result) {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn format_query_result(result: &QueryResult) -> Vec<String> {
    let mut lines = Vec::new();

    if result.answer.trim().is_empty() {
        lines.push("No answer found.".to_string());
    } else {
        lines.push(result.answer.clone());
    }

    if !result.sources.is_empty() {
        lines.push(String::new());
        lines.push("Sources:".to_string());
        lines.extend(result.sources.iter().map(|s| format!("  - {}", s)));
    }

    if let Some(confidence) = result.confidence {
        lines.push(format!("Confidence: {:.0}%", confidence * 100.0));
    }

    lines
}
