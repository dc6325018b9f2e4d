pub mod semantic;

use lexis_text::{strip_headers_footers, RawPage};
use serde::{Deserialize, Serialize};

pub use semantic::{ChunkerConfig, OffsetMode, SemanticChunker};

/// A window of consecutive sentences used as a retrieval unit.
///
/// Character positions count Unicode scalar values. The id is derived from
/// the character range, so the same input always yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub start_sentence: usize,
    pub end_sentence: usize,
    pub start_char: usize,
    pub end_char: usize,
}

impl Chunk {
    pub fn new(
        text: String,
        start_sentence: usize,
        end_sentence: usize,
        start_char: usize,
        end_char: usize,
    ) -> Result<Self, ChunkError> {
        if text.trim().is_empty() {
            return Err(ChunkError::EmptyText);
        }
        if start_sentence > end_sentence {
            return Err(ChunkError::SentenceRange {
                start: start_sentence,
                end: end_sentence,
            });
        }
        if start_char >= end_char {
            return Err(ChunkError::CharRange {
                start: start_char,
                end: end_char,
            });
        }

        Ok(Self {
            id: format!("{start_char}-{end_char}"),
            text,
            start_sentence,
            end_sentence,
            start_char,
            end_char,
        })
    }

    /// Whether this chunk's sentence range includes `index`.
    pub fn contains_sentence(&self, index: usize) -> bool {
        (self.start_sentence..=self.end_sentence).contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("chunk text is empty")]
    EmptyText,
    #[error("sentence range {start}..={end} is inverted")]
    SentenceRange { start: usize, end: usize },
    #[error("character range {start}..{end} is empty or inverted")]
    CharRange { start: usize, end: usize },
}

/// Trait for chunking strategies.
pub trait ChunkingStrategy: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<Chunk>;

    /// Chunk a paginated document: running headers/footers are stripped and
    /// pages are joined with a paragraph break before chunking.
    fn chunk_pages(&self, pages: &[RawPage]) -> Vec<Chunk> {
        self.chunk(&document_text(pages))
    }
}

/// Strip running headers/footers and join pages with a paragraph break.
pub fn document_text(pages: &[RawPage]) -> String {
    strip_headers_footers(pages)
        .iter()
        .map(RawPage::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_derived_from_range() {
        let chunk = Chunk::new("Hello.".to_string(), 0, 0, 12, 18).unwrap();
        assert_eq!(chunk.id, "12-18");
    }

    #[test]
    fn test_chunk_rejects_invalid_ranges() {
        assert_eq!(
            Chunk::new("x".to_string(), 2, 1, 0, 1),
            Err(ChunkError::SentenceRange { start: 2, end: 1 })
        );
        assert_eq!(
            Chunk::new("x".to_string(), 0, 0, 5, 5),
            Err(ChunkError::CharRange { start: 5, end: 5 })
        );
        assert_eq!(Chunk::new("  ".to_string(), 0, 0, 0, 2), Err(ChunkError::EmptyText));
    }

    #[test]
    fn test_chunk_serializes_camel_case() {
        let chunk = Chunk::new("Hi.".to_string(), 0, 0, 0, 3).unwrap();
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["startSentence"], 0);
        assert_eq!(json["endChar"], 3);
        assert_eq!(json["id"], "0-3");
    }

    #[test]
    fn test_chunk_pages_strips_running_headers() {
        let chunker = SemanticChunker::new(3000, 500);
        let pages = vec![
            RawPage::from("Unit 3\nCells divide by mitosis.\np. 1"),
            RawPage::from("Unit 3\nMitosis has four phases.\np. 1"),
        ];
        let chunks = chunker.chunk_pages(&pages);
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].text.contains("Unit 3"));
        assert!(chunks[0].text.contains("four phases"));
    }
}
