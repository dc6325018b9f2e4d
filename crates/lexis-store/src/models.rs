use chrono::{DateTime, Utc};
use lexis_chunker::Chunk;
use lexis_common::types::*;
use lexis_text::Sentence;
use serde::{Deserialize, Serialize};

/// Whether a document's chunks reached the retrieval oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IndexStatus {
    Indexed { count: usize },
    Unindexed { reason: String },
    /// No oracle configured.
    Disabled,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub source_format: Option<SourceFormat>,
    pub content_hash: String,
    pub num_pages: usize,
    pub sentences: Vec<Sentence>,
    pub chunks: Vec<Chunk>,
    pub index_status: IndexStatus,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a document, without its text.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub title: String,
    pub num_pages: usize,
    pub sentence_count: usize,
    pub chunk_count: usize,
    pub index_status: IndexStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            num_pages: doc.num_pages,
            sentence_count: doc.sentences.len(),
            chunk_count: doc.chunks.len(),
            index_status: doc.index_status.clone(),
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub filename: String,
    pub status: JobStatus,
    pub total_items: usize,
    pub processed_items: usize,
    pub document_id: Option<DocumentId>,
    pub error_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a new document record.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub title: String,
    pub source_format: Option<SourceFormat>,
    pub content_hash: String,
    pub num_pages: usize,
    pub sentences: Vec<Sentence>,
    pub chunks: Vec<Chunk>,
}

/// Outcome of a content-hash guarded insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Created(DocumentId),
    /// A document with the same content hash was already stored.
    Existing(DocumentId),
}
