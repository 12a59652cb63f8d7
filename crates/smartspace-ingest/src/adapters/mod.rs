//! Document reader implementations.

pub mod office_convert;
pub mod pdf_text;
pub mod text_native;

pub use office_convert::OfficeConvertAdapter;
pub use pdf_text::PdfTextAdapter;
pub use text_native::TextNativeAdapter;

use tokio::process::Command;

use smartspace_core::{Error, Result};

/// Run a command with a timeout, returning stdout as a string.
pub(crate) async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    cmd.kill_on_drop(true);
    let output = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::ExtractionFailed(format!(
                "External command timed out after {}s",
                timeout_secs
            ))
        })?
        .map_err(|e| Error::ExtractionFailed(format!("Failed to execute command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::ExtractionFailed(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
