//! Deterministic text preparation: line-break repair, running header/footer
//! removal, sentence segmentation and candidate phrase extraction.

pub mod headers;
pub mod normalize;
pub mod phrases;
pub mod sentence;
pub mod stopwords;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use headers::strip_headers_footers;
pub use normalize::{normalize, unify_line_endings};
pub use phrases::{extract_phrases, CandidatePhrase, PhraseKind};
pub use sentence::{split_sentences, RegexSentenceSplitter, Segmenter};

/// Text of one physical or logical page, as handed over by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPage(String);

impl RawPage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RawPage {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawPage {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Text that has been through [`normalize`]: no carriage returns, no
/// hyphen-split words, single spaces, paragraphs separated by `"\n\n"`.
///
/// The only way to obtain one is through [`normalize`], so holders can rely
/// on the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn from_normalized(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trimmed, non-empty sentence and its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

impl Sentence {
    /// Length in characters, the unit chunk budgets are measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
