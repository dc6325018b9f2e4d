use lexis_text::phrases::phrases_in;
use lexis_text::{extract_phrases, Sentence};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::distractor::{assemble_choices, DistractorSelector};

/// Placeholder substituted for the answer in a cloze prompt.
pub const BLANK: &str = "_____";

/// Sentences shorter than this leave too little context around the blank.
const MIN_SENTENCE_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipleChoiceQuestion {
    pub prompt: String,
    pub answer: String,
    pub choices: Vec<String>,
    pub answer_index: usize,
    pub source_sentence: usize,
}

/// Builds fill-in-the-blank multiple-choice questions from sentences.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionBuilder {
    selector: DistractorSelector,
}

impl QuestionBuilder {
    pub fn new(selector: DistractorSelector) -> Self {
        Self { selector }
    }

    /// Blank out the best answer phrase in `sentence` and surround it with
    /// distractors drawn from `pool`. Returns `None` when the sentence is too
    /// short or has no usable phrase.
    pub fn build<C: AsRef<str>, R: Rng + ?Sized>(
        &self,
        sentence: &Sentence,
        pool: &[C],
        rng: &mut R,
    ) -> Option<MultipleChoiceQuestion> {
        if sentence.text.split_whitespace().count() < MIN_SENTENCE_WORDS {
            return None;
        }

        let (answer, position) = pick_answer(sentence)?;
        let prompt = format!(
            "{}{}{}",
            &sentence.text[..position],
            BLANK,
            &sentence.text[position + answer.len()..]
        );

        // Phrases stated in the sentence itself would also be true.
        let lowered = sentence.text.to_lowercase();
        let candidates: Vec<&str> = pool
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !lowered.contains(&c.to_lowercase()))
            .collect();

        let distractors = self.selector.select(&answer, &candidates);
        let choice_set = assemble_choices(&answer, distractors, rng);

        Some(MultipleChoiceQuestion {
            prompt,
            answer,
            choices: choice_set.choices,
            answer_index: choice_set.answer_index,
            source_sentence: sentence.index,
        })
    }

    /// Up to `count` questions from randomly ordered sentences. The pool is
    /// every phrase of the document plus `extra_pool` (for example phrases
    /// from retrieved neighbour chunks).
    pub fn build_quiz<R: Rng + ?Sized>(
        &self,
        sentences: &[Sentence],
        extra_pool: &[String],
        count: usize,
        rng: &mut R,
    ) -> Vec<MultipleChoiceQuestion> {
        let pool: Vec<String> = extract_phrases(sentences)
            .into_iter()
            .map(|p| p.text)
            .chain(extra_pool.iter().cloned())
            .collect();

        let mut order: Vec<&Sentence> = sentences.iter().collect();
        order.shuffle(rng);

        let mut questions = Vec::with_capacity(count);
        for sentence in order {
            if questions.len() >= count {
                break;
            }
            if let Some(question) = self.build(sentence, &pool, rng) {
                questions.push(question);
            }
        }
        questions
    }
}

/// Quoted phrases beat capitalized sequences, which beat bigrams; longer
/// phrases win within a kind. Returns the phrase and its byte offset.
fn pick_answer(sentence: &Sentence) -> Option<(String, usize)> {
    let mut phrases = phrases_in(sentence);
    phrases.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| b.text.chars().count().cmp(&a.text.chars().count()))
    });

    phrases
        .into_iter()
        .find_map(|p| sentence.text.find(&p.text).map(|position| (p.text, position)))
}
