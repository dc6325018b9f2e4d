use lexis_common::config::AppConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::similarity::{similarity, SimilarityScore};

/// Number of wrong answers offered alongside the correct one.
pub const DISTRACTOR_COUNT: usize = 3;

/// Factor applied to the band's lower bound when too few candidates qualify.
const RELAXED_MIN_FACTOR: f64 = 0.6;

/// Used when the pool cannot supply enough plausible candidates.
pub const GENERIC_FILLERS: [&str; 4] = [
    "None of the above",
    "All of the above",
    "Not stated in the text",
    "Cannot be determined",
];

/// Accepted similarity range for a distractor: close enough to the answer to
/// be plausible, far enough to be clearly wrong.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBand {
    min: f64,
    max: f64,
}

impl SimilarityBand {
    pub fn new(min: f64, max: f64) -> Result<Self, BandError> {
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) {
            return Err(BandError::OutOfRange { min, max });
        }
        if min > max {
            return Err(BandError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, score: SimilarityScore) -> bool {
        (self.min..=self.max).contains(&score.value())
    }

    fn relaxed(&self) -> Self {
        Self {
            min: self.min * RELAXED_MIN_FACTOR,
            max: self.max,
        }
    }
}

impl Default for SimilarityBand {
    fn default() -> Self {
        Self { min: 0.12, max: 0.75 }
    }
}

impl TryFrom<&AppConfig> for SimilarityBand {
    type Error = BandError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        Self::new(config.min_sim, config.max_sim)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandError {
    #[error("similarity band bounds must lie in [0, 1], got [{min}, {max}]")]
    OutOfRange { min: f64, max: f64 },
    #[error("similarity band is inverted: min {min} > max {max}")]
    Inverted { min: f64, max: f64 },
}

/// Picks plausible wrong answers from a candidate pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistractorSelector {
    band: SimilarityBand,
}

impl DistractorSelector {
    pub fn new(band: SimilarityBand) -> Self {
        Self { band }
    }

    pub fn band(&self) -> SimilarityBand {
        self.band
    }

    /// Exactly [`DISTRACTOR_COUNT`] distractors, best-scoring first.
    ///
    /// Candidates inside the band are preferred. If too few qualify the lower
    /// bound is relaxed, and any remaining slots get generic fillers. The
    /// answer itself (case-insensitive) and duplicates are never returned.
    pub fn select<C: AsRef<str>>(&self, answer: &str, pool: &[C]) -> Vec<String> {
        let answer_key = answer.trim().to_lowercase();
        let mut seen: HashSet<String> = HashSet::from([answer_key]);

        let mut scored: Vec<(String, SimilarityScore)> = pool
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .filter(|c| seen.insert(c.to_lowercase()))
            .map(|c| (c.to_string(), similarity(answer, c)))
            .collect();
        scored.sort_by(|a, b| b.1.value().total_cmp(&a.1.value()));

        let mut chosen = take_in_band(&scored, self.band, &[]);
        if chosen.len() < DISTRACTOR_COUNT {
            let relaxed = take_in_band(&scored, self.band.relaxed(), &chosen);
            chosen.extend(relaxed.into_iter().take(DISTRACTOR_COUNT - chosen.len()));
        }

        if chosen.len() < DISTRACTOR_COUNT {
            tracing::debug!(
                found = chosen.len(),
                pool = pool.len(),
                "Too few candidates in band, padding with generic fillers"
            );
            let chosen_keys: HashSet<String> = chosen.iter().map(|c| c.to_lowercase()).collect();
            let answer_key = answer.trim().to_lowercase();
            let fillers = GENERIC_FILLERS
                .iter()
                .filter(|f| {
                    let key = f.to_lowercase();
                    key != answer_key && !chosen_keys.contains(&key)
                })
                .map(|f| f.to_string());
            let missing = DISTRACTOR_COUNT - chosen.len();
            chosen.extend(fillers.take(missing));
        }

        chosen
    }

    /// [`select`](Self::select) followed by a shuffle with the given source.
    pub fn select_shuffled<C: AsRef<str>, R: Rng + ?Sized>(
        &self,
        answer: &str,
        pool: &[C],
        rng: &mut R,
    ) -> Vec<String> {
        let mut distractors = self.select(answer, pool);
        distractors.shuffle(rng);
        distractors
    }
}

fn take_in_band(
    scored: &[(String, SimilarityScore)],
    band: SimilarityBand,
    exclude: &[String],
) -> Vec<String> {
    scored
        .iter()
        .filter(|(_, score)| band.contains(*score))
        .filter(|(text, _)| !exclude.contains(text))
        .take(DISTRACTOR_COUNT)
        .map(|(text, _)| text.clone())
        .collect()
}

/// A final choice set with the position of the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipleChoice {
    pub choices: Vec<String>,
    pub answer_index: usize,
}

/// Shuffle the distractors and insert the answer at a uniformly random
/// position, giving a uniform permutation of the full choice set.
pub fn assemble_choices<R: Rng + ?Sized>(
    answer: &str,
    mut distractors: Vec<String>,
    rng: &mut R,
) -> MultipleChoice {
    distractors.shuffle(rng);
    let answer_index = rng.gen_range(0..=distractors.len());
    distractors.insert(answer_index, answer.to_string());
    MultipleChoice {
        choices: distractors,
        answer_index,
    }
}
