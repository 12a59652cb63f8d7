//! Word-processor reader backed by pandoc.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use smartspace_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use smartspace_core::{Result, WordDocumentReader};

use super::run_cmd_with_timeout;

/// Converts `.docx` documents to plain text with `pandoc`.
#[derive(Debug, Clone)]
pub struct OfficeConvertAdapter {
    timeout_secs: u64,
}

impl Default for OfficeConvertAdapter {
    fn default() -> Self {
        Self::new(EXTRACTION_CMD_TIMEOUT_SECS)
    }
}

impl OfficeConvertAdapter {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

#[async_trait]
impl WordDocumentReader for OfficeConvertAdapter {
    async fn plain_text(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "Converting with pandoc");
        // pandoc -f docx -t plain --wrap=none INPUT
        run_cmd_with_timeout(
            Command::new("pandoc")
                .arg("-f")
                .arg("docx")
                .arg("-t")
                .arg("plain")
                .arg("--wrap=none")
                .arg(path),
            self.timeout_secs,
        )
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        match Command::new("pandoc").arg("--version").output().await {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "office_convert"
    }
}
