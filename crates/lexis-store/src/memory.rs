use chrono::Utc;
use lexis_common::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::*;

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentId, Document>,
    jobs: HashMap<JobId, Job>,
}

/// Process-local store for documents, their chunks and ingestion jobs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Documents ──

    /// Id of an already stored document with this content hash.
    pub async fn has_content_hash(&self, content_hash: &str) -> Option<DocumentId> {
        let inner = self.inner.read().await;
        inner
            .documents
            .values()
            .find(|d| d.content_hash == content_hash)
            .map(|d| d.id)
    }

    pub async fn create_document(&self, doc: CreateDocument) -> DocumentId {
        let id = DocumentId::new();
        let record = new_record(id, doc);
        tracing::debug!(document_id = %id, chunk_count = record.chunks.len(), "Document stored");
        self.inner.write().await.documents.insert(id, record);
        id
    }

    /// Store `doc` unless a document with the same content hash exists. The
    /// lookup and the insert happen under one write lock.
    pub async fn create_if_absent(&self, doc: CreateDocument) -> Insertion {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .documents
            .values()
            .find(|d| d.content_hash == doc.content_hash)
        {
            return Insertion::Existing(existing.id);
        }

        let id = DocumentId::new();
        let record = new_record(id, doc);
        tracing::debug!(document_id = %id, chunk_count = record.chunks.len(), "Document stored");
        inner.documents.insert(id, record);
        Insertion::Created(id)
    }

    pub async fn get_document(&self, id: DocumentId) -> Option<Document> {
        self.inner.read().await.documents.get(&id).cloned()
    }

    /// Newest first.
    pub async fn list_documents(&self) -> Vec<DocumentSummary> {
        let inner = self.inner.read().await;
        let mut docs: Vec<DocumentSummary> = inner.documents.values().map(DocumentSummary::from).collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        docs
    }

    pub async fn set_index_status(&self, id: DocumentId, status: IndexStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        doc.index_status = status;
        Ok(())
    }

    // ── Jobs ──

    pub async fn create_job(&self, filename: &str) -> JobId {
        let id = JobId::new();
        let job = Job {
            id,
            filename: filename.to_string(),
            status: JobStatus::Queued,
            total_items: 0,
            processed_items: 0,
            document_id: None,
            error_message: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        };
        self.inner.write().await.jobs.insert(id, job);
        id
    }

    pub async fn update_job_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::JobNotFound(id))?;
        tracing::debug!(job_id = %id, %status, "Job status updated");
        job.status = status;
        job.error_message = error_message.map(String::from);
        match status {
            JobStatus::Running => job.started_at = Some(Utc::now()),
            JobStatus::Completed | JobStatus::Failed => job.completed_at = Some(Utc::now()),
            JobStatus::Queued => {}
        }
        Ok(())
    }

    pub async fn update_job_progress(&self, id: JobId, processed: usize, total: usize) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::JobNotFound(id))?;
        job.processed_items = processed;
        job.total_items = total;
        Ok(())
    }

    pub async fn set_job_document(&self, id: JobId, document_id: DocumentId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let job = inner.jobs.get_mut(&id).ok_or(StoreError::JobNotFound(id))?;
        job.document_id = Some(document_id);
        Ok(())
    }

    pub async fn get_job(&self, id: JobId) -> Option<Job> {
        self.inner.read().await.jobs.get(&id).cloned()
    }
}

fn new_record(id: DocumentId, doc: CreateDocument) -> Document {
    Document {
        id,
        title: doc.title,
        source_format: doc.source_format,
        content_hash: doc.content_hash,
        num_pages: doc.num_pages,
        sentences: doc.sentences,
        chunks: doc.chunks,
        index_status: IndexStatus::Disabled,
        created_at: Utc::now(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
    #[error("job not found: {0}")]
    JobNotFound(JobId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, hash: &str) -> CreateDocument {
        CreateDocument {
            title: title.to_string(),
            source_format: Some(SourceFormat::PlainText),
            content_hash: hash.to_string(),
            num_pages: 1,
            sentences: Vec::new(),
            chunks: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_document_lookup_by_hash() {
        let store = MemoryStore::new();
        assert!(store.has_content_hash("abc").await.is_none());

        let id = store.create_document(create("notes.txt", "abc")).await;
        assert_eq!(store.has_content_hash("abc").await, Some(id));

        let doc = store.get_document(id).await.unwrap();
        assert_eq!(doc.title, "notes.txt");
        assert_eq!(doc.index_status, IndexStatus::Disabled);
    }

    #[tokio::test]
    async fn test_create_if_absent_under_contention() {
        let store = MemoryStore::new();
        let attempts = (0..8).map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create_if_absent(create(&format!("copy-{i}.txt"), "same")).await })
        });

        let mut created = 0;
        let mut existing = Vec::new();
        for attempt in attempts.collect::<Vec<_>>() {
            match attempt.await.unwrap() {
                Insertion::Created(_) => created += 1,
                Insertion::Existing(id) => existing.push(id),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(existing.len(), 7);
        assert_eq!(store.list_documents().await.len(), 1);
        let stored = store.has_content_hash("same").await.unwrap();
        assert!(existing.iter().all(|id| *id == stored));
    }

    #[tokio::test]
    async fn test_index_status_update() {
        let store = MemoryStore::new();
        let id = store.create_document(create("a.txt", "h1")).await;
        store
            .set_index_status(id, IndexStatus::Indexed { count: 4 })
            .await
            .unwrap();
        assert_eq!(
            store.get_document(id).await.unwrap().index_status,
            IndexStatus::Indexed { count: 4 }
        );

        let missing = store.set_index_status(DocumentId::new(), IndexStatus::Disabled).await;
        assert!(matches!(missing, Err(StoreError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let store = MemoryStore::new();
        let id = store.create_job("notes.txt").await;
        assert_eq!(store.get_job(id).await.unwrap().status, JobStatus::Queued);

        store.update_job_status(id, JobStatus::Running, None).await.unwrap();
        store.update_job_progress(id, 0, 1).await.unwrap();
        store.update_job_status(id, JobStatus::Failed, Some("bad input")).await.unwrap();

        let job = store.get_job(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.total_items, 1);
        assert_eq!(job.error_message.as_deref(), Some("bad input"));
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_list_documents_summaries() {
        let store = MemoryStore::new();
        store.create_document(create("a.txt", "h1")).await;
        store.create_document(create("b.txt", "h2")).await;
        let docs = store.list_documents().await;
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.chunk_count == 0));
    }
}
