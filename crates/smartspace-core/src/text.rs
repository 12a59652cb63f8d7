//! Text helpers shared by sampling, naming, and presentation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Truncate `s` to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate `s` to at most `max_bytes` bytes without splitting a character.
pub fn truncate_utf8_to_max_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Decode a byte prefix read from the start of a UTF-8 stream.
///
/// A multi-byte sequence cut off by the read limit is dropped. Any other
/// invalid sequence means the data is not UTF-8 and yields `None`.
pub fn decode_utf8_prefix(bytes: &[u8]) -> Option<&str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s),
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}

/// Fold a name for case- and diacritic-insensitive comparison.
pub fn fold_name(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two names ignoring case and diacritics.
pub fn names_equivalent(a: &str, b: &str) -> bool {
    fold_name(a) == fold_name(b)
}

/// English display name for an ISO 639-1 tag, or the tag itself when unknown.
pub fn language_display_name(code: &str) -> String {
    let name = match code.trim().to_lowercase().as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "ru" => "Russian",
        "uk" => "Ukrainian",
        "pl" => "Polish",
        "sv" => "Swedish",
        "tr" => "Turkish",
        "ar" => "Arabic",
        "he" => "Hebrew",
        "hi" => "Hindi",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        _ => return code.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_truncate_utf8_respects_char_boundary() {
        // "é" is two bytes; cutting at 2 would split it.
        assert_eq!(truncate_utf8_to_max_bytes("aé", 2), "a");
        assert_eq!(truncate_utf8_to_max_bytes("abc", 3), "abc");
    }

    #[test]
    fn test_decode_prefix_drops_cut_sequence() {
        let bytes = "abé".as_bytes();
        // Drop the last byte of "é".
        assert_eq!(decode_utf8_prefix(&bytes[..3]), Some("ab"));
    }

    #[test]
    fn test_decode_prefix_rejects_invalid() {
        assert_eq!(decode_utf8_prefix(&[0xFF, 0xFE, b'h', b'i']), None);
    }

    #[test]
    fn test_fold_name_ignores_case_and_diacritics() {
        assert_eq!(fold_name("  Café Notes "), "cafe notes");
        assert!(names_equivalent("RÉSUMÉ", "resume"));
        assert!(!names_equivalent("Biology", "Biologie"));
    }

    #[test]
    fn test_language_display_name() {
        assert_eq!(language_display_name("es"), "Spanish");
        assert_eq!(language_display_name("EN"), "English");
        assert_eq!(language_display_name("tlh"), "tlh");
    }
}
