//! Centralized default constants for SmartSpace.
//!
//! **This module is the single source of truth** for shared default values.
//! These are fixed application constants, not user-facing settings.

// =============================================================================
// SAMPLING
// =============================================================================

/// Maximum size of a language-identification sample.
///
/// Plain text is capped in bytes, extracted document text in characters.
pub const SAMPLE_CAP: usize = 8192;

/// Maximum number of PDF pages consulted when building a sample.
pub const MAX_PDF_PAGES: usize = 3;

/// Number of leading bytes read from a source to sniff its content type.
pub const CLASSIFY_SNIFF_BYTES: usize = 8192;

// =============================================================================
// LANGUAGE
// =============================================================================

/// The only language tag admitted by the language gate (ISO 639-1).
pub const SUPPORTED_LANGUAGE: &str = "en";

// =============================================================================
// ATTACHMENT STORAGE
// =============================================================================

/// Name of the attachment directory under the per-user data root.
pub const ATTACHMENTS_DIR_NAME: &str = "Attachments";

/// Suffix appended to the random identifier for pasted-text files.
pub const PASTED_SUFFIX: &str = "-pasted.txt";

/// User-facing file name recorded for pasted text.
pub const PASTED_ORIGINAL_NAME: &str = "Pasted text.txt";

/// Marker file that excludes the attachment directory from backups.
pub const BACKUP_EXCLUSION_MARKER: &str = "CACHEDIR.TAG";

/// Contents of the backup exclusion marker (Cache Directory Tagging Specification).
pub const BACKUP_EXCLUSION_MARKER_CONTENTS: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by SmartSpace.\n\
# Attachments stored here are excluded from backups.\n";

// =============================================================================
// SPACES
// =============================================================================

/// Maximum number of characters in a space name.
pub const SPACE_NAME_LIMIT: usize = 24;

// =============================================================================
// EXTRACTION
// =============================================================================

/// Timeout for a single external extraction command (`pdftotext`, `pandoc`).
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_bounds() {
        assert_eq!(SAMPLE_CAP, 8192);
        assert_eq!(MAX_PDF_PAGES, 3);
    }

    #[test]
    fn test_pasted_suffix_is_a_text_file() {
        assert!(PASTED_SUFFIX.starts_with('-'));
        assert!(PASTED_SUFFIX.ends_with(".txt"));
    }

    #[test]
    fn test_backup_marker_has_signature_line() {
        assert!(BACKUP_EXCLUSION_MARKER_CONTENTS
            .starts_with("Signature: 8a477f597d28d172789f06886806bc55"));
    }
}
