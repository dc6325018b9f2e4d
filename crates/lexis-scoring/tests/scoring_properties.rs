//! Property tests for similarity symmetry, grading bounds and distractor sets.

use lexis_scoring::distractor::DISTRACTOR_COUNT;
use lexis_scoring::similarity::{cosine, jaccard, tokenize};
use lexis_scoring::{breakdown, AnswerGrader, DistractorSelector, SimilarityScore};
use proptest::prelude::*;

fn phrase() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,6}"
}

proptest! {
    /// Every metric gives the same value with its arguments swapped.
    #[test]
    fn prop_metrics_symmetric(a in "\\PC{0,80}", b in "\\PC{0,80}") {
        prop_assert_eq!(breakdown(&a, &b), breakdown(&b, &a));

        let (ta, tb) = (tokenize(&a), tokenize(&b));
        prop_assert_eq!(cosine(&ta, &tb), cosine(&tb, &ta));
        prop_assert_eq!(jaccard(ta.iter(), tb.iter()), jaccard(tb.iter(), ta.iter()));
    }

    /// Scores stay within [0, 1].
    #[test]
    fn prop_scores_bounded(a in phrase(), b in phrase()) {
        let scores = breakdown(&a, &b);
        for score in [scores.jaccard, scores.cosine, scores.bigram_jaccard, scores.graded()] {
            prop_assert!((0.0..=1.0).contains(&score.value()));
        }
    }

    /// A response equal to an expected answer with content words scores 1.
    /// Words end in `q` so none of them is a stopword.
    #[test]
    fn prop_identical_response_correct(answer in "[a-z]{3,9}q( [a-z]{3,9}q){0,4}", points in 1u32..20) {
        let grade = AnswerGrader.grade(&answer, &[answer.as_str()], None, points);
        prop_assert_eq!(grade.score, SimilarityScore::ONE);
        prop_assert!(grade.correct);
        prop_assert_eq!(grade.points, points);
    }

    /// Distractors never repeat the answer and always number three.
    #[test]
    fn prop_distractors_exclude_answer(
        answer in phrase(),
        pool in prop::collection::vec(phrase(), 0..12),
    ) {
        let mut pool = pool;
        pool.push(answer.to_uppercase());
        let distractors = DistractorSelector::default().select(&answer, &pool);

        prop_assert_eq!(distractors.len(), DISTRACTOR_COUNT);
        let answer_key = answer.trim().to_lowercase();
        for distractor in &distractors {
            prop_assert_ne!(distractor.to_lowercase(), answer_key.clone());
        }
    }
}

#[test]
fn empty_response_always_incorrect() {
    for expected in ["cell", "produces ATP through respiration", ""] {
        let grade = AnswerGrader.grade("", &[expected], None, 5);
        assert_eq!(grade.score, SimilarityScore::ZERO);
        assert!(!grade.correct);
        assert_eq!(grade.points, 0);
    }
}
