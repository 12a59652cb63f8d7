//! Plain-text reader.

use std::path::Path;

use tokio::io::AsyncReadExt;

use smartspace_core::text::decode_utf8_prefix;
use smartspace_core::Result;

/// Reads a bounded UTF-8 prefix from a plain-text file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNativeAdapter;

impl TextNativeAdapter {
    /// Read at most `cap` bytes from the start of the file.
    pub async fn read_prefix(&self, path: &Path, cap: usize) -> Result<Vec<u8>> {
        let file = tokio::fs::File::open(path).await?;
        let mut buf = Vec::with_capacity(cap);
        file.take(cap as u64).read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Decoded prefix, or `None` when the file is unreadable, empty, or not UTF-8.
    pub async fn sample(&self, path: &Path, cap: usize) -> Option<String> {
        let bytes = self.read_prefix(path, cap).await.ok()?;
        let text = decode_utf8_prefix(&bytes)?;
        if text.trim().is_empty() {
            return None;
        }
        Some(text.to_string())
    }

    pub fn name(&self) -> &str {
        "text_native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_reads_whole_small_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "Hello, world!\nLine two.").unwrap();

        let sample = TextNativeAdapter.sample(&path, 8192).await;
        assert_eq!(sample.as_deref(), Some("Hello, world!\nLine two."));
    }

    #[tokio::test]
    async fn test_sample_capped_in_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "word ".repeat(5000)).unwrap();

        let sample = TextNativeAdapter.sample(&path, 8192).await.unwrap();
        assert_eq!(sample.len(), 8192);
    }

    #[tokio::test]
    async fn test_sample_drops_split_character_at_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accents.txt");
        // 'é' is two bytes; a cap of 3 cuts the second one in half.
        std::fs::write(&path, "éé").unwrap();

        let sample = TextNativeAdapter.sample(&path, 3).await;
        assert_eq!(sample.as_deref(), Some("é"));
    }

    #[tokio::test]
    async fn test_sample_none_for_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.txt");
        std::fs::write(&path, [0x66, 0xff, 0xfe, 0x41]).unwrap();

        assert!(TextNativeAdapter.sample(&path, 8192).await.is_none());
    }

    #[tokio::test]
    async fn test_sample_none_for_empty_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n").unwrap();

        assert!(TextNativeAdapter.sample(&path, 8192).await.is_none());
        assert!(TextNativeAdapter
            .sample(&dir.path().join("missing.txt"), 8192)
            .await
            .is_none());
    }
}
