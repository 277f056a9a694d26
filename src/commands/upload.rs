use anyhow::{Context, Result, bail};
use log::debug;
use std::path::PathBuf;

use crate::api::DocumentApi;
use crate::runtime::Runtime;
use crate::state::{AppState, UploadFile};

/// Upload one or more files concurrently
#[tracing::instrument(skip(runtime, state))]
pub async fn upload<R: Runtime, A: DocumentApi>(
    runtime: &R,
    state: &mut AppState<A>,
    paths: &[PathBuf],
) -> Result<()> {
    if paths.is_empty() {
        bail!("No files given to upload.");
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !runtime.exists(path) {
            bail!("File {} does not exist.", path.display());
        }
        if runtime.is_dir(path) {
            bail!("{} is a directory.", path.display());
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("Invalid file path {}", path.display()))?;
        let bytes = runtime.read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        files.push(UploadFile { filename, bytes });
    }

    let total = files.len();
    let outcomes = state.upload(files).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(receipt) => println!("Uploaded {} as {}", outcome.filename, receipt.id),
            Err(e) => {
                failed += 1;
                eprintln!("Failed to upload {}: {}", outcome.filename, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} upload(s) failed.", failed, total);
    }
    Ok(())
}
