use lexis_common::types::SourceFormat;
use std::collections::HashMap;

use crate::plaintext::{HtmlExtractor, PlainTextExtractor};
use crate::traits::{ExtractedDocument, Extractor};

/// Routes uploads to the extractor for their format.
///
/// Binary formats (PDF, DOCX) are decoded by external collaborators; until
/// one is registered for a format, uploads of it come back with an error.
pub struct ExtractorRegistry {
    extractors: HashMap<SourceFormat, Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlainTextExtractor));
        registry.register(Box::new(HtmlExtractor));
        registry
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.format(), extractor);
    }

    pub fn supports(&self, format: SourceFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    pub fn extract(&self, bytes: &[u8], filename: &str, mime: Option<&str>) -> ExtractedDocument {
        let Some(format) = SourceFormat::detect(filename, mime) else {
            tracing::warn!(filename, ?mime, "Unsupported file type");
            return ExtractedDocument::failed(format!("unsupported file type: {filename}"));
        };

        match self.extractors.get(&format) {
            Some(extractor) => {
                let doc = extractor.extract(bytes);
                tracing::debug!(filename, %format, pages = doc.num_pages, ok = doc.is_ok(), "Extracted document");
                doc
            }
            None => {
                tracing::warn!(filename, %format, "No extractor registered");
                ExtractedDocument::failed(format!("no extractor available for {format} documents"))
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePdf;

    impl Extractor for FakePdf {
        fn format(&self) -> SourceFormat {
            SourceFormat::Pdf
        }

        fn extract(&self, _bytes: &[u8]) -> ExtractedDocument {
            ExtractedDocument::from_pages(vec!["pdf page".to_string()])
        }
    }

    #[test]
    fn test_routes_by_extension() {
        let doc = ExtractorRegistry::with_defaults().extract(b"<p>Hi</p>", "page.html", None);
        assert_eq!(doc.text, "Hi");
    }

    #[test]
    fn test_unknown_type_is_an_error_result() {
        let doc = ExtractorRegistry::with_defaults().extract(b"data", "archive.zip", None);
        assert_eq!(doc.error.as_deref(), Some("unsupported file type: archive.zip"));
    }

    #[test]
    fn test_binary_format_without_extractor() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(!registry.supports(SourceFormat::Pdf));
        let doc = registry.extract(b"%PDF-1.7", "notes.pdf", Some("application/pdf"));
        assert_eq!(doc.error.as_deref(), Some("no extractor available for pdf documents"));
    }

    #[test]
    fn test_registered_collaborator_is_used() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Box::new(FakePdf));
        let doc = registry.extract(b"%PDF-1.7", "notes.pdf", None);
        assert_eq!(doc.pages, vec!["pdf page"]);
    }
}
