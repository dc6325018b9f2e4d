use lexis_common::config::AppConfig;
use lexis_text::{normalize, RegexSentenceSplitter, Segmenter, Sentence};
use serde::{Deserialize, Serialize};

use crate::{Chunk, ChunkingStrategy};

/// How the next chunk's `start_char` is derived after backing up for overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// `previous start + max(1, previous length - overlap)`. Cheap, and close
    /// to where the overlapping sentences begin, but not exact.
    #[default]
    Approximate,
    /// Offsets recomputed from the single-space join of all sentences, so a
    /// chunk's range addresses exactly its own text in that join.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub chunk_chars: usize,
    pub overlap_chars: usize,
    #[serde(default)]
    pub offset_mode: OffsetMode,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_chars: 3000,
            overlap_chars: 500,
            offset_mode: OffsetMode::Approximate,
        }
    }
}

impl From<&AppConfig> for ChunkerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            chunk_chars: config.chunk_chars,
            overlap_chars: config.overlap_chars,
            offset_mode: OffsetMode::default(),
        }
    }
}

/// Sentence-windowed chunker: packs whole sentences up to a character budget
/// and starts each following window a few sentences back so neighbours
/// overlap.
#[derive(Debug, Clone)]
pub struct SemanticChunker<S = RegexSentenceSplitter> {
    config: ChunkerConfig,
    segmenter: S,
}

impl SemanticChunker {
    pub fn new(chunk_chars: usize, overlap_chars: usize) -> Self {
        Self::with_config(ChunkerConfig {
            chunk_chars,
            overlap_chars,
            offset_mode: OffsetMode::Approximate,
        })
    }

    pub fn default_config() -> Self {
        Self::with_config(ChunkerConfig::default())
    }

    pub fn with_config(config: ChunkerConfig) -> Self {
        Self::with_segmenter(config, RegexSentenceSplitter)
    }
}

impl<S: Segmenter> SemanticChunker<S> {
    pub fn with_segmenter(config: ChunkerConfig, segmenter: S) -> Self {
        Self { config, segmenter }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Normalize `text` and split it with this chunker's segmenter.
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        self.segmenter.split(&normalize(text))
    }

    /// Window already-segmented sentences.
    ///
    /// Every sentence lands in at least one chunk, each chunk holds at least
    /// one sentence, and the starting sentence strictly advances from one
    /// chunk to the next even when `overlap_chars >= chunk_chars`.
    pub fn chunk_sentences(&self, sentences: &[Sentence]) -> Vec<Chunk> {
        let count = sentences.len();
        if count == 0 {
            return Vec::new();
        }

        let budget = self.config.chunk_chars.max(1);
        let overlap = self.config.overlap_chars;
        let lengths: Vec<usize> = sentences.iter().map(Sentence::char_len).collect();
        let join_offsets: Vec<usize> = lengths
            .iter()
            .scan(0, |pos, len| {
                let start = *pos;
                *pos += len + 1;
                Some(start)
            })
            .collect();

        let mut chunks = Vec::new();
        let mut idx = 0;
        let mut char_pos = 0;

        while idx < count {
            let start_idx = idx;
            let start_char = char_pos;
            let mut body = String::new();
            let mut body_len = 0;

            while idx < count {
                let separator = usize::from(!body.is_empty());
                let next_len = body_len + separator + lengths[idx];
                if !body.is_empty() && next_len > budget {
                    break;
                }
                if separator == 1 {
                    body.push(' ');
                }
                body.push_str(&sentences[idx].text);
                body_len = next_len;
                idx += 1;
            }

            match Chunk::new(body, start_idx, idx - 1, start_char, start_char + body_len) {
                Ok(chunk) => chunks.push(chunk),
                Err(e) => {
                    tracing::warn!(error = %e, sentence = start_idx, "Stopping chunking at invalid window");
                    break;
                }
            }

            if idx >= count {
                break;
            }

            // Back up over trailing sentences until the overlap budget is met,
            // never returning to this window's first sentence.
            let mut next_idx = idx;
            let mut backed = 0;
            while next_idx > start_idx + 1 && backed < overlap {
                next_idx -= 1;
                backed += lengths[next_idx];
            }

            char_pos = match self.config.offset_mode {
                OffsetMode::Approximate => start_char + body_len.saturating_sub(overlap).max(1),
                OffsetMode::Exact => join_offsets[next_idx],
            };
            idx = next_idx;
        }

        tracing::debug!(sentences = count, chunks = chunks.len(), "Chunked text");
        chunks
    }
}

impl<S: Segmenter> ChunkingStrategy for SemanticChunker<S> {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunk_sentences(&self.segment(text))
    }
}
