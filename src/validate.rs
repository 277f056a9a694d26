//! Pre-flight checks run before a request is built.
//!
//! Every failure here is an [`ApiError`] of kind `Rejected`, so callers can
//! tell "never sent" apart from "sent and refused".

use std::path::Path;

use crate::api::ApiError;
use crate::config::Settings;

/// Trims `query` and checks it is non-empty and within `max_len` characters.
pub fn validate_query(query: &str, max_len: usize) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::rejected("Query cannot be empty"));
    }

    let len = trimmed.chars().count();
    if len > max_len {
        return Err(ApiError::rejected(format!(
            "Query is too long ({} characters, maximum is {})",
            len, max_len
        )));
    }

    Ok(trimmed)
}

pub fn validate_max_results(max_results: u32) -> Result<(), ApiError> {
    if max_results == 0 {
        return Err(ApiError::rejected("max_results must be at least 1"));
    }
    Ok(())
}

/// MIME type guessed from the file extension.
pub fn mime_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Checks an upload against the size limit and the extension/MIME allow lists.
pub fn validate_upload(
    settings: &Settings,
    filename: &str,
    mime: &str,
    size: u64,
) -> Result<(), ApiError> {
    if filename.trim().is_empty() {
        return Err(ApiError::rejected("File name cannot be empty"));
    }

    let allowed = settings.allowed_extensions.join(", ");
    let extension_ok = extension_of(filename)
        .is_some_and(|ext| settings.allowed_extensions.iter().any(|a| *a == ext));
    if !extension_ok {
        return Err(ApiError::rejected(format!(
            "Unsupported file type for {}. Allowed types: {}",
            filename, allowed
        )));
    }

    let mime_ok = settings
        .allowed_mime_types
        .iter()
        .any(|m| m.eq_ignore_ascii_case(mime));
    if !mime_ok {
        return Err(ApiError::rejected(format!(
            "Unsupported content type {} for {}. Allowed types: {}",
            mime, filename, allowed
        )));
    }

    if size == 0 {
        return Err(ApiError::rejected(format!("{} is empty", filename)));
    }

    if size > settings.max_upload_bytes {
        return Err(ApiError::rejected(format!(
            "{} is too large ({} bytes, maximum is {} bytes)",
            filename, size, settings.max_upload_bytes
        )));
    }

    Ok(())
}
