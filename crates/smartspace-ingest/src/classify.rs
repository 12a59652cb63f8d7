//! Content-family classification.
//!
//! Resolution order: declared MIME type, then the type sniffed from the
//! source's leading bytes, then the file extension. Generic container
//! types (`application/octet-stream`, `application/zip`) and malformed
//! MIME strings do not resolve anything and defer to the next source.
//! A specific type that is none of the supported families is final.

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use tracing::debug;

use smartspace_core::{
    is_generic_mime, is_text_like_mime, is_valid_mime_type, mime_from_extension,
    sanitize_filename, sniff_content_type, ContentFamily, DOCX_MIME,
};

/// A caller-supplied file to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Type hint from the caller, if any.
    pub declared_mime: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            declared_mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.declared_mime = Some(mime.into());
        self
    }

    /// User-facing name: the last path component.
    pub fn original_file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| sanitize_filename(&self.path.to_string_lossy()))
    }

    fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }
}

/// Family for a MIME type. `None` when the type does not decide.
pub fn family_for_mime(mime: &str) -> Option<ContentFamily> {
    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !is_valid_mime_type(&mime) || is_generic_mime(&mime) {
        return None;
    }
    let family = if mime == "application/pdf" {
        ContentFamily::Pdf
    } else if mime == DOCX_MIME {
        ContentFamily::WordDocument
    } else if is_text_like_mime(&mime) {
        ContentFamily::PlainText
    } else {
        ContentFamily::Unsupported
    };
    Some(family)
}

/// Classify from the declared hint, sniffed leading bytes, and extension.
pub fn classify(source: &SourceFile, leading_bytes: &[u8]) -> ContentFamily {
    if let Some(family) = source.declared_mime.as_deref().and_then(family_for_mime) {
        return family;
    }
    if let Some(family) = sniff_content_type(leading_bytes).and_then(family_for_mime) {
        return family;
    }
    source
        .extension()
        .and_then(|ext| mime_from_extension(&ext))
        .and_then(family_for_mime)
        .unwrap_or(ContentFamily::Unsupported)
}

/// Read up to `sniff_bytes` from the start of `path`. Unreadable files
/// yield an empty prefix; the copy step reports the real error.
async fn read_leading_bytes(path: &Path, sniff_bytes: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(sniff_bytes.min(64 * 1024));
    match tokio::fs::File::open(path).await {
        Ok(file) => {
            if let Err(e) = file.take(sniff_bytes as u64).read_to_end(&mut buf).await {
                debug!(path = %path.display(), error = %e, "Could not read source for sniffing");
                buf.clear();
            }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not open source for sniffing");
        }
    }
    buf
}

/// Classify a file on disk.
pub async fn classify_file(source: &SourceFile, sniff_bytes: usize) -> ContentFamily {
    let leading = read_leading_bytes(&source.path, sniff_bytes).await;
    let family = classify(source, &leading);
    debug!(
        subsystem = "ingest",
        component = "classifier",
        path = %source.path.display(),
        declared_mime = source.declared_mime.as_deref().unwrap_or(""),
        content_family = %family,
        "Classified source"
    );
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_HEADER: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n";

    #[test]
    fn test_family_for_mime() {
        assert_eq!(family_for_mime("text/plain"), Some(ContentFamily::PlainText));
        assert_eq!(
            family_for_mime("text/plain; charset=utf-8"),
            Some(ContentFamily::PlainText)
        );
        assert_eq!(family_for_mime("application/pdf"), Some(ContentFamily::Pdf));
        assert_eq!(family_for_mime(DOCX_MIME), Some(ContentFamily::WordDocument));
        assert_eq!(family_for_mime("image/png"), Some(ContentFamily::Unsupported));
        assert_eq!(family_for_mime("application/octet-stream"), None);
        assert_eq!(family_for_mime("not a mime"), None);
    }

    #[test]
    fn test_declared_type_wins() {
        let source = SourceFile::new("/tmp/report.txt").with_mime("application/pdf");
        assert_eq!(classify(&source, b"plain words"), ContentFamily::Pdf);
    }

    #[test]
    fn test_specific_declared_type_is_final() {
        let source = SourceFile::new("/tmp/photo.txt").with_mime("image/jpeg");
        assert_eq!(classify(&source, b""), ContentFamily::Unsupported);
    }

    #[test]
    fn test_sniffed_type_used_without_declaration() {
        let source = SourceFile::new("/tmp/download");
        assert_eq!(classify(&source, PDF_HEADER), ContentFamily::Pdf);
    }

    #[test]
    fn test_generic_declared_type_defers() {
        let source = SourceFile::new("/tmp/notes.md").with_mime("application/octet-stream");
        assert_eq!(classify(&source, b"# Title"), ContentFamily::PlainText);
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(
            classify(&SourceFile::new("/tmp/a.TXT"), b"hello"),
            ContentFamily::PlainText
        );
        assert_eq!(
            classify(&SourceFile::new("/tmp/a.docx"), b""),
            ContentFamily::WordDocument
        );
        assert_eq!(
            classify(&SourceFile::new("/tmp/a.pdf"), b""),
            ContentFamily::Pdf
        );
    }

    #[test]
    fn test_rtf_is_plain_text() {
        let rtf = b"{\\rtf1\\ansi\\deff0 The students read the chapter.}";
        assert_eq!(
            classify(&SourceFile::new("/tmp/essay.rtf"), rtf),
            ContentFamily::PlainText
        );
        assert_eq!(
            classify(&SourceFile::new("/tmp/essay.rtf"), b""),
            ContentFamily::PlainText
        );
        let declared = SourceFile::new("/tmp/essay").with_mime("application/rtf");
        assert_eq!(classify(&declared, rtf), ContentFamily::PlainText);
    }

    #[test]
    fn test_nothing_resolves() {
        assert_eq!(
            classify(&SourceFile::new("/tmp/archive.bin"), b"\x00\x01\x02"),
            ContentFamily::Unsupported
        );
        assert_eq!(
            classify(&SourceFile::new("/tmp/README"), b"plain words"),
            ContentFamily::Unsupported
        );
    }

    #[test]
    fn test_original_file_name() {
        let source = SourceFile::new("/home/user/docs/Lecture 1.pdf");
        assert_eq!(source.original_file_name(), "Lecture 1.pdf");
    }

    #[tokio::test]
    async fn test_classify_file_reads_leading_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan");
        std::fs::write(&path, PDF_HEADER).unwrap();

        let family = classify_file(&SourceFile::new(&path), 8192).await;
        assert_eq!(family, ContentFamily::Pdf);
    }

    #[tokio::test]
    async fn test_classify_missing_file_uses_extension() {
        let family = classify_file(&SourceFile::new("/nonexistent/notes.txt"), 8192).await;
        assert_eq!(family, ContentFamily::PlainText);
    }
}
