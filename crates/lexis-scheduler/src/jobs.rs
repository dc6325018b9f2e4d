use lexis_common::types::*;
use lexis_ingestion::Upload;

/// A job to be executed by the worker pool.
#[derive(Debug, Clone)]
pub enum JobPayload {
    /// Extract, chunk and index an uploaded file.
    FileUpload { job_id: JobId, upload: Upload },
}

impl JobPayload {
    pub fn job_id(&self) -> JobId {
        match self {
            JobPayload::FileUpload { job_id, .. } => *job_id,
        }
    }
}
