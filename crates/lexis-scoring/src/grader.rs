use serde::Serialize;

use crate::similarity::{grading_similarity, SimilarityScore};

/// Minimum similarity for a response to count as correct.
pub const CORRECT_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grade {
    pub score: SimilarityScore,
    pub correct: bool,
    pub points: u32,
    pub max_points: u32,
    /// The reference text the response matched best, if any scored above zero.
    pub best_match: Option<String>,
}

/// Scores free-text responses against expected answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerGrader;

impl AnswerGrader {
    /// Grade `response` against every expected answer and keep the best match.
    ///
    /// When no non-blank expected answer exists, `explanation` is used as the
    /// reference instead. A correct response earns `max_points`; otherwise the
    /// award is `round(score * max_points)`.
    pub fn grade<A: AsRef<str>>(
        &self,
        response: &str,
        expected: &[A],
        explanation: Option<&str>,
        max_points: u32,
    ) -> Grade {
        let mut references: Vec<&str> = expected
            .iter()
            .map(AsRef::as_ref)
            .filter(|answer| !answer.trim().is_empty())
            .collect();
        if references.is_empty() {
            references.extend(explanation.filter(|e| !e.trim().is_empty()));
        }

        let (score, best_match) = references
            .into_iter()
            .map(|reference| (grading_similarity(response, reference), reference))
            .fold((SimilarityScore::ZERO, None), |(best, best_ref), (score, reference)| {
                if score > best {
                    (score, Some(reference.to_string()))
                } else {
                    (best, best_ref)
                }
            });

        let correct = score.value() >= CORRECT_THRESHOLD;
        let points = if correct {
            max_points
        } else {
            (score.value() * f64::from(max_points)).round().max(0.0) as u32
        };

        tracing::debug!(score = score.value(), correct, points, "Graded response");

        Grade {
            score,
            correct,
            points,
            max_points,
            best_match,
        }
    }
}
