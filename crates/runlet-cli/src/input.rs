//! Turning command-line arguments into execution requests

use anyhow::{anyhow, Context, Result};
use runlet_core::{ExecutionRequest, Language};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// The explicit `--language` wins; otherwise the file extension decides.
pub fn language_for(path: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(tag) = explicit {
        return Ok(tag.to_string());
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Language::from_extension)
        .map(|language| language.tag().to_string())
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer language for '{}'; pass --language",
                path.display()
            )
        })
}

pub async fn requests_from_files(
    files: &[PathBuf],
    explicit: Option<&str>,
) -> Result<Vec<ExecutionRequest>> {
    let mut requests = Vec::with_capacity(files.len());
    for path in files {
        let language = language_for(path, explicit)?;
        let code = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        requests.push(ExecutionRequest::new(code, language));
    }
    Ok(requests)
}

pub async fn request_from_stdin(explicit: Option<&str>) -> Result<ExecutionRequest> {
    let language = explicit
        .ok_or_else(|| anyhow!("Reading code from stdin requires --language"))?
        .to_string();
    let mut code = String::new();
    tokio::io::stdin()
        .read_to_string(&mut code)
        .await
        .context("Failed to read code from stdin")?;
    Ok(ExecutionRequest::new(code, language))
}
