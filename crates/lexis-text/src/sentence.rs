use regex::Regex;
use std::sync::LazyLock;

use crate::{NormalizedText, Sentence};

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+\s*|[^.!?]+$").expect("valid sentence regex"));

/// Splits normalized text into an ordered sequence of sentences.
///
/// Implementations must return trimmed, non-empty sentences with positional
/// indices starting at zero.
pub trait Segmenter: Send + Sync {
    fn split(&self, text: &NormalizedText) -> Vec<Sentence>;
}

/// Punctuation-driven splitter: a sentence runs up to one or more of `.`,
/// `!`, `?`, or to the end of the text.
///
/// Abbreviations ("Dr.") and decimals ("3.14") end a sentence early; no
/// disambiguation is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSentenceSplitter;

impl Segmenter for RegexSentenceSplitter {
    fn split(&self, text: &NormalizedText) -> Vec<Sentence> {
        SENTENCE
            .find_iter(text.as_str())
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(index, s)| Sentence {
                index,
                text: s.to_string(),
            })
            .collect()
    }
}

/// Split with the default [`RegexSentenceSplitter`].
pub fn split_sentences(text: &NormalizedText) -> Vec<Sentence> {
    RegexSentenceSplitter.split(text)
}
