use futures::future::join_all;
use lexis_chunker::{document_text, Chunk, SemanticChunker};
use lexis_common::types::*;
use lexis_connectors::{hash_content, ExtractedDocument, ExtractorRegistry};
use lexis_oracle_client::{ChunkItem, RetrievalOracle};
use lexis_store::models::{CreateDocument, IndexStatus};
use lexis_store::{Insertion, MemoryStore, StoreError};
use lexis_text::Sentence;
use std::sync::Arc;

/// Id under which a chunk is indexed by the oracle. Chunk ids are positional
/// and repeat across documents, so the document id qualifies them.
pub fn oracle_chunk_id(document_id: DocumentId, chunk_id: &str) -> String {
    format!("{document_id}/{chunk_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestResult {
    Indexed {
        document_id: DocumentId,
        chunk_count: usize,
        index_status: IndexStatus,
    },
    /// Same content was ingested before.
    Skipped { document_id: DocumentId },
    /// The document had no text to chunk.
    Empty,
}

/// An uploaded file awaiting extraction.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Sentences and chunks derived from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    pub sentences: Vec<Sentence>,
    pub chunks: Vec<Chunk>,
}

pub struct IngestionPipeline {
    store: MemoryStore,
    oracle: Option<Arc<dyn RetrievalOracle>>,
    extractors: ExtractorRegistry,
    chunker: SemanticChunker,
}

impl IngestionPipeline {
    pub fn new(
        store: MemoryStore,
        oracle: Option<Arc<dyn RetrievalOracle>>,
        extractors: ExtractorRegistry,
        chunker: SemanticChunker,
    ) -> Self {
        Self {
            store,
            oracle,
            extractors,
            chunker,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn oracle(&self) -> Option<&dyn RetrievalOracle> {
        self.oracle.as_deref()
    }

    pub fn chunker(&self) -> &SemanticChunker {
        &self.chunker
    }

    /// Header/footer stripping, segmentation and chunking. Pure and synchronous.
    pub fn prepare(&self, doc: &ExtractedDocument) -> PreparedText {
        let text = document_text(&doc.raw_pages());
        let sentences = self.chunker.segment(&text);
        let chunks = self.chunker.chunk_sentences(&sentences);
        PreparedText { sentences, chunks }
    }

    /// Extract an uploaded file and ingest it.
    pub async fn ingest_upload(&self, upload: &Upload) -> Result<IngestResult, IngestionError> {
        let extracted = self
            .extractors
            .extract(&upload.bytes, &upload.filename, upload.mime.as_deref());
        let format = SourceFormat::detect(&upload.filename, upload.mime.as_deref());
        self.ingest(&upload.filename, format, extracted).await
    }

    /// Ingest several uploads concurrently. Results keep the input order.
    pub async fn ingest_batch(&self, uploads: &[Upload]) -> Vec<Result<IngestResult, IngestionError>> {
        join_all(uploads.iter().map(|upload| self.ingest_upload(upload))).await
    }

    /// Process one extracted document through the full pipeline.
    pub async fn ingest(
        &self,
        title: &str,
        source_format: Option<SourceFormat>,
        doc: ExtractedDocument,
    ) -> Result<IngestResult, IngestionError> {
        // 1. Extraction failures are reported, not retried
        if let Some(error) = &doc.error {
            return Err(IngestionError::Extraction(error.clone()));
        }

        // 2. Skip unchanged content
        let content_hash = hash_content(doc.text.as_bytes());
        if let Some(document_id) = self.store.has_content_hash(&content_hash).await {
            tracing::debug!(title, %document_id, "Document unchanged, skipping");
            return Ok(IngestResult::Skipped { document_id });
        }

        // 3. Strip headers/footers, segment and chunk
        let prepared = self.prepare(&doc);
        if prepared.chunks.is_empty() {
            tracing::warn!(title, "No chunks produced, skipping");
            return Ok(IngestResult::Empty);
        }

        // 4. Store the document; a concurrent upload of the same content may have won
        let chunk_count = prepared.chunks.len();
        let chunks = prepared.chunks.clone();
        let insertion = self
            .store
            .create_if_absent(CreateDocument {
                title: title.to_string(),
                source_format,
                content_hash,
                num_pages: doc.num_pages,
                sentences: prepared.sentences,
                chunks: prepared.chunks,
            })
            .await;
        let document_id = match insertion {
            Insertion::Created(id) => id,
            Insertion::Existing(document_id) => {
                tracing::debug!(title, %document_id, "Document stored concurrently, skipping");
                return Ok(IngestResult::Skipped { document_id });
            }
        };

        let items: Vec<ChunkItem> = chunks
            .into_iter()
            .map(|c| ChunkItem {
                id: oracle_chunk_id(document_id, &c.id),
                text: c.text,
            })
            .collect();

        // 5. Best-effort indexing; failure leaves the document usable locally
        let index_status = self.index(&items).await;
        self.store
            .set_index_status(document_id, index_status.clone())
            .await?;

        tracing::info!(
            title,
            %document_id,
            chunk_count,
            ?index_status,
            "Document ingested successfully"
        );

        Ok(IngestResult::Indexed {
            document_id,
            chunk_count,
            index_status,
        })
    }

    async fn index(&self, items: &[ChunkItem]) -> IndexStatus {
        let Some(oracle) = self.oracle.as_deref() else {
            return IndexStatus::Disabled;
        };

        match oracle.encode(items).await {
            Ok(ack) => IndexStatus::Indexed { count: ack.count },
            Err(e) => {
                tracing::warn!(error = %e, "Indexing failed, continuing with local candidate pools");
                IndexStatus::Unindexed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
}
