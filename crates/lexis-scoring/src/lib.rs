//! Similarity scoring and the two consumers built on it: free-text answer
//! grading and distractor selection for multiple-choice questions.

pub mod distractor;
pub mod grader;
pub mod question;
pub mod similarity;

pub use distractor::{assemble_choices, BandError, DistractorSelector, MultipleChoice, SimilarityBand};
pub use grader::{AnswerGrader, Grade, CORRECT_THRESHOLD};
pub use question::{MultipleChoiceQuestion, QuestionBuilder};
pub use similarity::{breakdown, grading_similarity, similarity, SimilarityBreakdown, SimilarityScore};
