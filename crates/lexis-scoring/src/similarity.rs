use lexis_text::stopwords::is_stopword;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A similarity in `[0, 1]`. Out-of-range inputs are clamped and NaN maps to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

/// The three independent signals between two spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub jaccard: SimilarityScore,
    pub cosine: SimilarityScore,
    pub bigram_jaccard: SimilarityScore,
}

impl SimilarityBreakdown {
    /// General text similarity: the better of token overlap and term-frequency cosine.
    pub fn combined(&self) -> SimilarityScore {
        self.jaccard.max(self.cosine)
    }

    /// Similarity used for grading, which also credits matching word order.
    pub fn graded(&self) -> SimilarityScore {
        self.combined().max(self.bigram_jaccard)
    }
}

/// Lowercase, replace non-alphanumerics with spaces, split on whitespace and
/// drop stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

pub fn breakdown(a: &str, b: &str) -> SimilarityBreakdown {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return SimilarityBreakdown::default();
    }

    SimilarityBreakdown {
        jaccard: jaccard(tokens_a.iter(), tokens_b.iter()),
        cosine: cosine(&tokens_a, &tokens_b),
        bigram_jaccard: jaccard(bigrams(&tokens_a), bigrams(&tokens_b)),
    }
}

pub fn similarity(a: &str, b: &str) -> SimilarityScore {
    breakdown(a, b).combined()
}

pub fn grading_similarity(a: &str, b: &str) -> SimilarityScore {
    breakdown(a, b).graded()
}

/// `|A ∩ B| / |A ∪ B|` over distinct items; 0 when either side is empty.
pub fn jaccard<T: Ord>(a: impl IntoIterator<Item = T>, b: impl IntoIterator<Item = T>) -> SimilarityScore {
    let set_a: BTreeSet<T> = a.into_iter().collect();
    let set_b: BTreeSet<T> = b.into_iter().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return SimilarityScore::ZERO;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    SimilarityScore::new(intersection as f64 / union as f64)
}

/// Cosine of term-frequency vectors; 0 when either vector is all zero.
///
/// Terms are visited in sorted order so swapping the arguments performs the
/// same floating-point operations.
pub fn cosine(a: &[String], b: &[String]) -> SimilarityScore {
    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);

    let dot: f64 = tf_a
        .iter()
        .filter_map(|(term, count_a)| tf_b.get(term).map(|count_b| count_a * count_b))
        .sum();
    let norm_a = tf_a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = tf_b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return SimilarityScore::ZERO;
    }
    SimilarityScore::new(dot / (norm_a * norm_b))
}

fn term_frequencies(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut tf = BTreeMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    tf
}

fn bigrams(tokens: &[String]) -> Vec<(&str, &str)> {
    tokens
        .windows(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect()
}
