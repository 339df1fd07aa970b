//! One-shot detection of optional interpreter runtimes.
//!
//! Results are computed once when the scheduler is built and treated as ground
//! truth for the rest of the process lifetime. Installing or removing a runtime
//! afterwards is not noticed.

use serde::Serialize;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use which::which;

use super::language::Language;
use crate::config::ExecutorConfig;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns true when `binary` is on `PATH` and `<binary> --version` exits zero.
pub async fn probe(binary: &str) -> bool {
    let path = match which(binary) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("{} not found on PATH: {}", binary, e);
            return false;
        }
    };

    let status = Command::new(&path)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    match tokio::time::timeout(PROBE_TIMEOUT, status).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            log::debug!("Probing {} failed: {}", path.display(), e);
            false
        }
        Err(_) => {
            log::warn!("Probing {} timed out", path.display());
            false
        }
    }
}

/// Cached availability of the optional runtimes. Languages that are not
/// optional always report as available.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunnerAvailability {
    runtimes: HashMap<Language, bool>,
}

impl RunnerAvailability {
    /// Probe every optional runtime named by `config`.
    pub async fn detect(config: &ExecutorConfig) -> Self {
        let mut runtimes = HashMap::new();
        for language in Language::ALL.into_iter().filter(Language::is_optional) {
            let binary = config.interpreters.binary_for(language);
            let available = probe(binary).await;
            if available {
                log::info!("{} runtime available via {}", language.display_name(), binary);
            } else {
                log::warn!(
                    "{} runtime not available ({}); {} requests will be refused",
                    language.display_name(),
                    binary,
                    language.tag()
                );
            }
            runtimes.insert(language, available);
        }
        Self { runtimes }
    }

    /// Build from known flags without probing anything.
    pub fn fixed(flags: impl IntoIterator<Item = (Language, bool)>) -> Self {
        Self {
            runtimes: flags.into_iter().collect(),
        }
    }

    pub fn is_available(&self, language: Language) -> bool {
        if !language.is_optional() {
            return true;
        }
        self.runtimes.get(&language).copied().unwrap_or(false)
    }
}
