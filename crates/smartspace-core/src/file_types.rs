//! File name and content-type helpers.
//!
//! Content types come from three places, in decreasing order of trust:
//! 1. A type declared by the caller (e.g. a picker's content type)
//! 2. Magic byte detection via `infer`
//! 3. The file extension

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// MIME type of word-processor documents (Office Open XML).
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME types that say nothing about the contained format.
pub const GENERIC_MIME_TYPES: &[&str] = &["application/octet-stream", "application/zip"];

/// Extension → MIME mapping for formats the importer understands.
///
/// Text formats have no magic bytes, so the extension is the only signal.
/// PDF and docx are included so a file without readable magic bytes still
/// gets routed to the right sampler, which then decides if it is usable.
static EXTENSION_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Plain text
        ("txt", "text/plain"),
        ("text", "text/plain"),
        ("log", "text/plain"),
        ("csv", "text/csv"),
        ("tsv", "text/tab-separated-values"),
        // Markup
        ("md", "text/markdown"),
        ("markdown", "text/markdown"),
        ("rst", "text/x-rst"),
        ("html", "text/html"),
        ("htm", "text/html"),
        ("xml", "application/xml"),
        ("json", "application/json"),
        ("yaml", "application/yaml"),
        ("yml", "application/yaml"),
        ("rtf", "text/rtf"),
        // Documents
        ("pdf", "application/pdf"),
        ("docx", DOCX_MIME),
    ]
    .into_iter()
    .collect()
});

/// Map a file extension (without dot, any case) to a MIME type.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    EXTENSION_MIME
        .get(ext.trim_start_matches('.').to_lowercase().as_str())
        .copied()
}

/// Detect a MIME type from leading bytes. `None` when no signature matches.
pub fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// True for MIME types that identify a container without naming its format.
pub fn is_generic_mime(mime: &str) -> bool {
    GENERIC_MIME_TYPES.contains(&mime.trim().to_lowercase().as_str())
}

/// True for MIME types whose payload is human-readable text.
pub fn is_text_like_mime(mime_type: &str) -> bool {
    let mt = mime_type.trim().to_ascii_lowercase();
    if mt.starts_with("text/") {
        return true;
    }
    matches!(
        mt.as_str(),
        "application/json"
            | "application/xml"
            | "application/xhtml+xml"
            | "application/x-yaml"
            | "application/yaml"
            | "application/toml"
            | "application/x-toml"
            | "application/rtf"
    )
}

/// Validate MIME type format per RFC 2045 (type/subtype).
pub fn is_valid_mime_type(mime: &str) -> bool {
    let parts: Vec<&str> = mime.split('/').collect();
    if parts.len() != 2 {
        return false;
    }
    let (media_type, subtype) = (parts[0], parts[1]);
    if media_type.is_empty() || subtype.is_empty() {
        return false;
    }
    let is_token_char = |c: char| -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '!' | '#' | '$' | '&' | '-' | '^' | '_' | '.' | '+')
    };
    media_type.chars().all(is_token_char) && subtype.chars().all(is_token_char)
}

/// Last path component of a user-supplied name, made safe for storage.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return "unnamed_file".to_string();
    }

    // Leave room for the identifier prefix within common 255-byte limits.
    const MAX_LEN: usize = 200;
    if sanitized.len() > MAX_LEN {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            if ext.len() < MAX_LEN {
                let stem = crate::text::truncate_utf8_to_max_bytes(
                    &sanitized[..dot_pos],
                    MAX_LEN - ext.len(),
                );
                return format!("{}{}", stem, ext);
            }
        }
        return crate::text::truncate_utf8_to_max_bytes(sanitized, MAX_LEN).to_string();
    }

    sanitized.to_string()
}
