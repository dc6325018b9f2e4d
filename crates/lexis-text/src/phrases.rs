use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::stopwords::is_stopword;
use crate::Sentence;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]{2,80})"|“([^”]{2,80})”"#).expect("valid quoted-phrase regex")
});

/// How a candidate phrase was found, in order of preference as an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseKind {
    Quoted,
    Capitalized,
    Bigram,
}

/// A short span usable as an answer or a distractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePhrase {
    pub text: String,
    pub kind: PhraseKind,
    pub sentence_index: usize,
}

/// Candidate phrases from a single sentence, quoted spans first, then
/// capitalized sequences, then word bigrams. May contain repeats.
pub fn phrases_in(sentence: &Sentence) -> Vec<CandidatePhrase> {
    let make = |text: String, kind: PhraseKind| CandidatePhrase {
        text,
        kind,
        sentence_index: sentence.index,
    };

    let mut phrases: Vec<CandidatePhrase> = QUOTED
        .captures_iter(&sentence.text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| make(s, PhraseKind::Quoted))
        .collect();

    let words: Vec<Word<'_>> = sentence.text.split_whitespace().map(Word::new).collect();

    phrases.extend(
        capitalized_runs(&words)
            .into_iter()
            .map(|s| make(s, PhraseKind::Capitalized)),
    );

    phrases.extend(
        words
            .windows(2)
            .filter(|pair| pair[0].is_content() && pair[1].is_content() && !pair[0].ends_clause)
            .map(|pair| make(format!("{} {}", pair[0].core, pair[1].core), PhraseKind::Bigram)),
    );

    phrases
}

/// Candidate phrases for a whole document, deduplicated case-insensitively
/// (first occurrence wins).
pub fn extract_phrases(sentences: &[Sentence]) -> Vec<CandidatePhrase> {
    let mut seen = HashSet::new();
    sentences
        .iter()
        .flat_map(phrases_in)
        .filter(|p| seen.insert(p.text.to_lowercase()))
        .collect()
}

struct Word<'a> {
    core: &'a str,
    ends_clause: bool,
}

impl<'a> Word<'a> {
    fn new(raw: &'a str) -> Self {
        let core = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let ends_clause = raw
            .chars()
            .next_back()
            .is_some_and(|c| matches!(c, ',' | ';' | ':' | '.' | '!' | '?' | ')'));
        Self { core, ends_clause }
    }

    fn is_capitalized(&self) -> bool {
        self.core.chars().next().is_some_and(char::is_uppercase) && self.core.chars().count() > 1
    }

    fn is_content(&self) -> bool {
        self.core.chars().count() >= 3
            && self.core.chars().all(char::is_alphanumeric)
            && !is_stopword(&self.core.to_lowercase())
    }
}

/// Runs of capitalized words. A lone capitalized word only counts when it is
/// not the first word of the sentence.
fn capitalized_runs(words: &[Word<'_>]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut run_start = 0;

    for (i, word) in words.iter().enumerate() {
        if word.is_capitalized() && !is_stopword(&word.core.to_lowercase()) {
            if current.is_empty() {
                run_start = i;
            }
            current.push(word.core);
            if word.ends_clause {
                flush_run(&mut runs, &mut current, run_start);
            }
        } else {
            flush_run(&mut runs, &mut current, run_start);
        }
    }
    flush_run(&mut runs, &mut current, run_start);

    runs
}

fn flush_run(runs: &mut Vec<String>, current: &mut Vec<&str>, run_start: usize) {
    if current.len() >= 2 || (current.len() == 1 && run_start > 0) {
        runs.push(current.join(" "));
    }
    current.clear();
}
