// src/executors/staging.rs
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, TempPath};

use crate::errors::ExecutorError;

/// Source text written to a uniquely named temporary file. The file is closed
/// before the interpreter sees it and removed when this value is dropped.
pub(crate) struct StagedSource {
    path: TempPath,
}

impl StagedSource {
    pub(crate) fn write(prefix: &str, suffix: &str, code: &str) -> Result<Self, ExecutorError> {
        let mut file = Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile()
            .map_err(ExecutorError::Staging)?;

        file.write_all(code.as_bytes())
            .map_err(ExecutorError::Staging)?;
        file.flush().map_err(ExecutorError::Staging)?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
