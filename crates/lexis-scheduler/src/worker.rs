use lexis_common::types::*;
use lexis_ingestion::{IngestResult, IngestionError, IngestionPipeline};
use lexis_store::MemoryStore;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::jobs::JobPayload;

const QUEUE_DEPTH: usize = 256;

/// Async worker pool that processes ingestion jobs.
#[derive(Clone)]
pub struct WorkerPool {
    tx: mpsc::Sender<JobPayload>,
}

impl WorkerPool {
    /// Spawn a worker pool with `concurrency` parallel workers.
    pub fn spawn(concurrency: usize, pipeline: Arc<IngestionPipeline>) -> Self {
        let (tx, rx) = mpsc::channel::<JobPayload>(QUEUE_DEPTH);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        for worker_id in 0..concurrency.max(1) {
            let rx = rx.clone();
            let pipeline = pipeline.clone();

            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut rx = rx.lock().await;
                        rx.recv().await
                    };

                    let Some(job) = job else {
                        tracing::info!(worker_id, "Worker channel closed, shutting down");
                        break;
                    };

                    let job_id = job.job_id();
                    let store = pipeline.store();
                    tracing::info!(worker_id, %job_id, "Processing job");

                    let _ = store.update_job_status(job_id, JobStatus::Running, None).await;

                    match process_job(&pipeline, store, job).await {
                        Ok(()) => {
                            let _ = store.update_job_status(job_id, JobStatus::Completed, None).await;
                            tracing::info!(worker_id, %job_id, "Job completed");
                        }
                        Err(e) => {
                            let err_msg = e.to_string();
                            let _ = store
                                .update_job_status(job_id, JobStatus::Failed, Some(&err_msg))
                                .await;
                            tracing::error!(worker_id, %job_id, error = %e, "Job failed");
                        }
                    }
                }
            });
        }

        Self { tx }
    }

    /// Submit a job to the worker pool.
    pub async fn submit(&self, job: JobPayload) -> Result<(), SubmitError> {
        self.tx.send(job).await.map_err(|e| SubmitError(e.0.job_id()))
    }
}

async fn process_job(
    pipeline: &IngestionPipeline,
    store: &MemoryStore,
    job: JobPayload,
) -> Result<(), IngestionError> {
    match job {
        JobPayload::FileUpload { job_id, upload } => {
            store.update_job_progress(job_id, 0, 1).await?;
            let result = pipeline.ingest_upload(&upload).await?;
            match result {
                IngestResult::Indexed { document_id, .. } | IngestResult::Skipped { document_id } => {
                    store.set_job_document(job_id, document_id).await?;
                }
                IngestResult::Empty => {
                    return Err(IngestionError::Extraction(format!(
                        "{} contains no text",
                        upload.filename
                    )));
                }
            }
            store.update_job_progress(job_id, 1, 1).await?;
            Ok(())
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("worker pool is shut down, job {0} was not queued")]
pub struct SubmitError(pub JobId);

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_chunker::SemanticChunker;
    use lexis_connectors::ExtractorRegistry;
    use lexis_ingestion::Upload;
    use std::time::Duration;

    fn pool() -> (WorkerPool, MemoryStore) {
        let store = MemoryStore::new();
        let pipeline = Arc::new(IngestionPipeline::new(
            store.clone(),
            None,
            ExtractorRegistry::with_defaults(),
            SemanticChunker::new(200, 40),
        ));
        (WorkerPool::spawn(2, pipeline), store)
    }

    async fn submit(pool: &WorkerPool, store: &MemoryStore, filename: &str, text: &str) -> JobId {
        let job_id = store.create_job(filename).await;
        let upload = Upload {
            filename: filename.to_string(),
            mime: None,
            bytes: text.as_bytes().to_vec(),
        };
        pool.submit(JobPayload::FileUpload { job_id, upload }).await.unwrap();
        job_id
    }

    async fn wait_until_finished(store: &MemoryStore, job_id: JobId) -> lexis_store::models::Job {
        for _ in 0..200 {
            let job = store.get_job(job_id).await.unwrap();
            if matches!(job.status, JobStatus::Completed | JobStatus::Failed) {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {job_id} did not finish");
    }

    #[tokio::test]
    async fn test_upload_job_completes() {
        let (pool, store) = pool();
        let job_id = submit(&pool, &store, "cells.txt", "Cells divide by mitosis. Plants need light.").await;

        let job = wait_until_finished(&store, job_id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!((job.processed_items, job.total_items), (1, 1));
        assert!(job.started_at.is_some() && job.completed_at.is_some());

        let doc = store.get_document(job.document_id.unwrap()).await.unwrap();
        assert_eq!(doc.sentences.len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_upload_fails_job() {
        let (pool, store) = pool();
        let job_id = submit(&pool, &store, "archive.zip", "PK").await;

        let job = wait_until_finished(&store, job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.unwrap().contains("unsupported file type"));
        assert!(job.document_id.is_none());
    }

    #[tokio::test]
    async fn test_empty_upload_fails_job() {
        let (pool, store) = pool();
        let job_id = submit(&pool, &store, "blank.txt", "   ").await;

        let job = wait_until_finished(&store, job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.unwrap().contains("no text"));
    }
}
