//! Language identification and the admission gate.

use std::sync::Arc;

use tracing::debug;

use smartspace_core::{Error, LanguageIdentifier, Result};

/// [`LanguageIdentifier`] backed by `whatlang` trigram detection.
///
/// Reports the detector's top choice as an ISO 639-1 tag, or the
/// ISO 639-3 code for languages without a two-letter tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangIdentifier;

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, sample: &str) -> Option<String> {
        let info = whatlang::detect(sample)?;
        let code = info.lang().code();
        Some(iso_639_1(code).unwrap_or(code).to_string())
    }
}

/// Two-letter tag for a three-letter code, where one exists.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let tag = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(tag)
}

/// Admits a sample only when its identified language is the supported tag.
pub struct LanguageGate {
    identifier: Arc<dyn LanguageIdentifier>,
    supported: String,
}

impl LanguageGate {
    pub fn new(identifier: Arc<dyn LanguageIdentifier>, supported: impl Into<String>) -> Self {
        Self {
            identifier,
            supported: supported.into(),
        }
    }

    pub fn supported_language(&self) -> &str {
        &self.supported
    }

    /// The admitted tag, or `LanguageUnsupported` carrying what was detected.
    pub fn admit(&self, sample: &str) -> Result<String> {
        let detected = self.identifier.identify(sample);
        let admitted = detected.as_deref() == Some(self.supported.as_str());
        debug!(
            subsystem = "ingest",
            component = "language_gate",
            language = detected.as_deref().unwrap_or("unknown"),
            admitted,
            "Language verdict"
        );
        match detected {
            Some(tag) if admitted => Ok(tag),
            other => Err(Error::LanguageUnsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGLISH: &str = "The committee reviewed the annual budget on Tuesday and agreed \
        that the library should stay open later during the examination period, \
        because many students had asked for a quiet place to work in the evenings.";

    const SPANISH: &str = "El comité revisó el presupuesto anual el martes y acordó que \
        la biblioteca debería permanecer abierta hasta más tarde durante el periodo \
        de exámenes, porque muchos estudiantes habían pedido un lugar tranquilo.";

    struct FixedIdentifier(Option<&'static str>);

    impl LanguageIdentifier for FixedIdentifier {
        fn identify(&self, _sample: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_whatlang_identifies_english() {
        assert_eq!(WhatlangIdentifier.identify(ENGLISH).as_deref(), Some("en"));
    }

    #[test]
    fn test_whatlang_identifies_spanish() {
        assert_eq!(WhatlangIdentifier.identify(SPANISH).as_deref(), Some("es"));
    }

    #[test]
    fn test_whatlang_empty_is_unknown() {
        assert_eq!(WhatlangIdentifier.identify(""), None);
    }

    #[test]
    fn test_iso_mapping() {
        assert_eq!(iso_639_1("eng"), Some("en"));
        assert_eq!(iso_639_1("cmn"), Some("zh"));
        assert_eq!(iso_639_1("xyz"), None);
    }

    #[test]
    fn test_gate_admits_exact_match() {
        let gate = LanguageGate::new(Arc::new(FixedIdentifier(Some("en"))), "en");
        assert_eq!(gate.admit("anything").unwrap(), "en");
    }

    #[test]
    fn test_gate_rejects_other_language() {
        let gate = LanguageGate::new(Arc::new(FixedIdentifier(Some("es"))), "en");
        let err = gate.admit("hola").unwrap_err();
        assert!(matches!(err, Error::LanguageUnsupported(Some(ref tag)) if tag == "es"));
    }

    #[test]
    fn test_gate_rejects_unknown() {
        let gate = LanguageGate::new(Arc::new(FixedIdentifier(None)), "en");
        assert!(matches!(
            gate.admit("???").unwrap_err(),
            Error::LanguageUnsupported(None)
        ));
    }

    #[test]
    fn test_gate_match_is_exact() {
        let gate = LanguageGate::new(Arc::new(FixedIdentifier(Some("EN"))), "en");
        assert!(gate.admit("text").is_err());
    }
}
