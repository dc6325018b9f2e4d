use lexis_common::types::SourceFormat;
use lexis_text::RawPage;
use serde::{Deserialize, Serialize};

/// Result of turning an uploaded file into text.
///
/// Extraction never fails loudly: problems are reported through `error`
/// alongside empty text and pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: Vec<String>,
    pub num_pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedDocument {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self {
            text: pages.join("\n\n"),
            num_pages: pages.len(),
            pages,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Pages as pipeline input. A document without page structure is one page.
    pub fn raw_pages(&self) -> Vec<RawPage> {
        if self.pages.is_empty() && !self.text.is_empty() {
            return vec![RawPage::new(self.text.clone())];
        }
        self.pages.iter().cloned().map(RawPage::from).collect()
    }
}

/// Every supported source format has an extractor.
pub trait Extractor: Send + Sync {
    fn format(&self) -> SourceFormat;

    fn extract(&self, bytes: &[u8]) -> ExtractedDocument;
}
