//! PDF reader backed by poppler-utils (`pdfinfo`, `pdftotext`).

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use smartspace_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use smartspace_core::{Error, PdfReader, Result};

use super::run_cmd_with_timeout;

/// Page-oriented PDF text access through external commands.
///
/// Each invocation is guarded by a per-command timeout. Pages are 0-based
/// at this interface and translated to poppler's 1-based numbering.
#[derive(Debug, Clone)]
pub struct PdfTextAdapter {
    timeout_secs: u64,
}

impl Default for PdfTextAdapter {
    fn default() -> Self {
        Self::new(EXTRACTION_CMD_TIMEOUT_SECS)
    }
}

impl PdfTextAdapter {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

/// Page count from `pdfinfo` output.
fn parse_page_count(output: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("pages") {
            value.trim().parse::<usize>().ok()
        } else {
            None
        }
    })
}

#[async_trait]
impl PdfReader for PdfTextAdapter {
    async fn page_count(&self, path: &Path) -> Result<usize> {
        let output =
            run_cmd_with_timeout(Command::new("pdfinfo").arg(path), self.timeout_secs).await?;
        parse_page_count(&output).ok_or_else(|| {
            Error::ExtractionFailed(format!("No page count reported for {}", path.display()))
        })
    }

    async fn page_text(&self, path: &Path, index: usize) -> Result<Option<String>> {
        let page = (index + 1).to_string();
        trace!(path = %path.display(), page = index + 1, "Extracting PDF page");
        let text = run_cmd_with_timeout(
            Command::new("pdftotext")
                .arg("-q")
                .arg("-enc")
                .arg("UTF-8")
                .arg("-f")
                .arg(&page)
                .arg("-l")
                .arg(&page)
                .arg(path)
                .arg("-"),
            self.timeout_secs,
        )
        .await?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let pdfinfo = Command::new("pdfinfo").arg("-v").output().await;
        let pdftotext = Command::new("pdftotext").arg("-v").output().await;
        // Both print their version to stderr and exit 0 or 99 depending on version.
        let present = |out: std::io::Result<std::process::Output>| match out {
            Ok(o) => o.status.success() || o.status.code() == Some(99),
            Err(_) => false,
        };
        Ok(present(pdfinfo) && present(pdftotext))
    }

    fn name(&self) -> &str {
        "pdf_text"
    }
}
