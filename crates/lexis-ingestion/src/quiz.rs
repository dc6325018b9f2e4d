use lexis_common::types::DocumentId;
use lexis_oracle_client::neighbours_or_empty;
use lexis_scoring::{DistractorSelector, MultipleChoiceQuestion, QuestionBuilder};
use lexis_text::{extract_phrases, normalize, split_sentences};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pipeline::{oracle_chunk_id, IngestionError, IngestionPipeline};

/// Neighbour chunks requested per quiz to widen the distractor pool.
const NEIGHBOUR_COUNT: usize = 5;

impl IngestionPipeline {
    /// Build up to `count` multiple-choice questions for a stored document.
    ///
    /// Distractors come from the document's own phrases plus phrases found
    /// in neighbouring chunks returned by the oracle, when one is reachable.
    /// A fixed `seed` makes the quiz reproducible.
    pub async fn build_quiz(
        &self,
        document_id: DocumentId,
        count: usize,
        selector: DistractorSelector,
        seed: Option<u64>,
    ) -> Result<Vec<MultipleChoiceQuestion>, IngestionError> {
        let doc = self
            .store()
            .get_document(document_id)
            .await
            .ok_or(IngestionError::DocumentNotFound(document_id))?;

        let extra_pool = match doc.chunks.first() {
            Some(chunk) => {
                let neighbours = neighbours_or_empty(self.oracle(), &chunk.text, NEIGHBOUR_COUNT).await;
                neighbours
                    .iter()
                    .filter(|n| !doc.chunks.iter().any(|c| oracle_chunk_id(document_id, &c.id) == n.id))
                    .flat_map(|n| extract_phrases(&split_sentences(&normalize(&n.text))))
                    .map(|p| p.text)
                    .collect()
            }
            None => Vec::new(),
        };

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let questions = QuestionBuilder::new(selector).build_quiz(&doc.sentences, &extra_pool, count, &mut rng);
        tracing::info!(
            %document_id,
            requested = count,
            built = questions.len(),
            extra_pool = extra_pool.len(),
            "Quiz built"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{pipeline, upload, FakeOracle};
    use crate::pipeline::IngestResult;
    use lexis_oracle_client::Neighbor;
    use std::sync::Arc;

    const TEXT: &str = "The theory of endosymbiosis was proposed by Lynn Margulis in 1967. \
        Mitochondria produce ATP through cellular respiration. \
        Chloroplasts perform photosynthesis in plant cells. \
        The nucleus stores genetic information.";

    async fn ingest(pipeline: &IngestionPipeline) -> DocumentId {
        match pipeline.ingest_upload(&upload("cells.txt", TEXT)).await.unwrap() {
            IngestResult::Indexed { document_id, .. } => document_id,
            other => panic!("expected indexed result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quiz_is_reproducible_with_seed() {
        let pipeline = pipeline(None);
        let id = ingest(&pipeline).await;

        let first = pipeline.build_quiz(id, 2, DistractorSelector::default(), Some(7)).await.unwrap();
        let second = pipeline.build_quiz(id, 2, DistractorSelector::default(), Some(7)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        for q in &first {
            assert_eq!(q.choices.len(), 4);
            assert!(q.prompt.contains(lexis_scoring::question::BLANK));
            assert_eq!(q.choices[q.answer_index], q.answer);
        }
    }

    #[tokio::test]
    async fn test_quiz_uses_neighbour_phrases() {
        let oracle = Arc::new(FakeOracle {
            neighbours: vec![Neighbor {
                id: "other-1".to_string(),
                text: "Cell cycle control was studied by Lynn Hartwell.".to_string(),
                score: 0.8,
            }],
            ..FakeOracle::default()
        });
        let pipeline = pipeline(Some(oracle));
        let id = ingest(&pipeline).await;

        let quiz = pipeline.build_quiz(id, 4, DistractorSelector::default(), Some(1)).await.unwrap();
        let margulis = quiz.iter().find(|q| q.answer == "Lynn Margulis").unwrap();
        assert!(margulis.choices.iter().any(|c| c == "Lynn Hartwell"));
    }

    #[tokio::test]
    async fn test_quiz_keeps_foreign_neighbour_with_same_range() {
        let indexed = pipeline(None);
        let id = ingest(&indexed).await;
        let doc = indexed.store().get_document(id).await.unwrap();
        let own_range = doc.chunks[0].id.clone();

        // Same positional range, but indexed under another document.
        let foreign = Neighbor {
            id: oracle_chunk_id(DocumentId::new(), &own_range),
            text: "Cell cycle control was studied by Lynn Hartwell.".to_string(),
            score: 0.7,
        };
        let own = Neighbor {
            id: oracle_chunk_id(id, &own_range),
            text: "Genes were mapped by Lynn Sanders.".to_string(),
            score: 0.9,
        };
        let pipeline = IngestionPipeline::new(
            indexed.store().clone(),
            Some(Arc::new(FakeOracle {
                neighbours: vec![own, foreign],
                ..FakeOracle::default()
            })),
            lexis_connectors::ExtractorRegistry::with_defaults(),
            lexis_chunker::SemanticChunker::new(80, 20),
        );

        let quiz = pipeline.build_quiz(id, 4, DistractorSelector::default(), Some(1)).await.unwrap();
        let margulis = quiz.iter().find(|q| q.answer == "Lynn Margulis").unwrap();
        assert!(margulis.choices.iter().any(|c| c == "Lynn Hartwell"));
        assert!(!margulis.choices.iter().any(|c| c == "Lynn Sanders"));
    }

    #[tokio::test]
    async fn test_quiz_survives_oracle_failure() {
        let oracle = Arc::new(FakeOracle {
            fail: true,
            ..FakeOracle::default()
        });
        let pipeline = pipeline(Some(oracle));
        let id = ingest(&pipeline).await;

        let quiz = pipeline.build_quiz(id, 3, DistractorSelector::default(), Some(2)).await.unwrap();
        assert!(!quiz.is_empty());
    }

    #[tokio::test]
    async fn test_quiz_unknown_document() {
        let pipeline = pipeline(None);
        let err = pipeline
            .build_quiz(DocumentId::new(), 3, DistractorSelector::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::DocumentNotFound(_)));
    }
}
