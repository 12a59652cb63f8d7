//! Bounded text sampling per content family.
//!
//! Every strategy yields `None` rather than an empty string when nothing
//! usable comes out of the source.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use smartspace_core::text::truncate_chars;
use smartspace_core::{ContentFamily, PdfReader, WordDocumentReader};

use crate::adapters::TextNativeAdapter;
use crate::config::IngestConfig;

/// Extracts a language-identification sample from a stored file.
pub struct TextSampler {
    pdf: Arc<dyn PdfReader>,
    word: Arc<dyn WordDocumentReader>,
    text: TextNativeAdapter,
    sample_cap: usize,
    max_pdf_pages: usize,
}

impl TextSampler {
    pub fn new(
        config: &IngestConfig,
        pdf: Arc<dyn PdfReader>,
        word: Arc<dyn WordDocumentReader>,
    ) -> Self {
        Self {
            pdf,
            word,
            text: TextNativeAdapter,
            sample_cap: config.sample_cap,
            max_pdf_pages: config.max_pdf_pages,
        }
    }

    pub async fn sample(&self, family: ContentFamily, path: &Path) -> Option<String> {
        let sample = match family {
            ContentFamily::PlainText => self.text.sample(path, self.sample_cap).await,
            ContentFamily::Pdf => self.sample_pdf(path).await,
            ContentFamily::WordDocument => self.sample_word_document(path).await,
            ContentFamily::Unsupported => None,
        };
        debug!(
            subsystem = "ingest",
            component = "sampler",
            content_family = %family,
            sample_chars = sample.as_deref().map(|s| s.chars().count()).unwrap_or(0),
            "Sampled source"
        );
        sample
    }

    /// Concatenate the first pages until the cap is reached.
    async fn sample_pdf(&self, path: &Path) -> Option<String> {
        let pages = match self.pdf.page_count(path).await {
            Ok(n) => n,
            Err(e) => {
                debug!(path = %path.display(), reader = self.pdf.name(), error = %e, "PDF could not be opened");
                return None;
            }
        };

        let mut sample = String::new();
        let mut sampled_chars = 0usize;
        for index in 0..pages.min(self.max_pdf_pages) {
            let page = match self.pdf.page_text(path, index).await {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    trace!(page = index, error = %e, "Skipping unreadable PDF page");
                    continue;
                }
            };
            let page = page.trim();
            if page.is_empty() {
                continue;
            }
            if !sample.is_empty() {
                sample.push(' ');
                sampled_chars += 1;
            }
            sample.push_str(page);
            sampled_chars += page.chars().count();
            if sampled_chars >= self.sample_cap {
                break;
            }
        }

        non_empty(truncate_chars(&sample, self.sample_cap))
    }

    async fn sample_word_document(&self, path: &Path) -> Option<String> {
        match self.word.plain_text(path).await {
            Ok(text) => non_empty(truncate_chars(text.trim(), self.sample_cap)),
            Err(e) => {
                debug!(path = %path.display(), reader = self.word.name(), error = %e, "Document could not be converted");
                None
            }
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim_end();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
