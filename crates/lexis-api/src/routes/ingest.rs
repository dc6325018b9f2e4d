use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use lexis_common::types::*;
use lexis_ingestion::Upload;
use lexis_scheduler::JobPayload;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingest/upload", post(upload))
        .route("/ingest/jobs/{job_id}", get(get_job))
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    filename: String,
    content: String,
    /// Overrides extension-based format detection.
    mime: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    job_id: Uuid,
    status: JobStatus,
}

async fn upload(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content cannot be empty".to_string()));
    }
    if SourceFormat::detect(&req.filename, req.mime.as_deref()).is_none() {
        return Err(ApiError::BadRequest(format!(
            "unsupported file type: {}",
            req.filename
        )));
    }

    let job_id = state.store.create_job(&req.filename).await;

    state
        .worker_pool
        .submit(JobPayload::FileUpload {
            job_id,
            upload: Upload {
                filename: req.filename,
                mime: req.mime,
                bytes: req.content.into_bytes(),
            },
        })
        .await
        .map_err(|e| ApiError::Internal(format!("failed to submit job: {e}")))?;

    Ok(Json(UploadResponse {
        job_id: job_id.0,
        status: JobStatus::Queued,
    }))
}

#[derive(Debug, Serialize)]
struct JobResponse {
    job_id: Uuid,
    filename: String,
    status: JobStatus,
    progress: JobProgress,
    document_id: Option<Uuid>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct JobProgress {
    total: usize,
    processed: usize,
}

async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = state
        .store
        .get_job(JobId(job_id))
        .await
        .ok_or(ApiError::NotFound)?;

    Ok(Json(JobResponse {
        job_id: job.id.0,
        filename: job.filename,
        status: job.status,
        progress: JobProgress {
            total: job.total_items,
            processed: job.processed_items,
        },
        document_id: job.document_id.map(|id| id.0),
        error: job.error_message,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, get, post};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_upload_runs_to_completion() {
        let app = app();
        let (status, body) = post(
            &app,
            "/api/v1/ingest/upload",
            json!({ "filename": "cells.txt", "content": "Cells divide by mitosis. Plants need light." }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "queued");

        let uri = format!("/api/v1/ingest/jobs/{}", body["job_id"].as_str().unwrap());
        let mut job = serde_json::Value::Null;
        for _ in 0..200 {
            let (_, body) = get(&app, &uri).await;
            if body["status"] == "completed" || body["status"] == "failed" {
                job = body;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(job["status"], "completed");
        assert_eq!(job["progress"]["processed"], 1);
        assert!(job["document_id"].is_string());
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_content() {
        let (status, body) = post(
            &app(),
            "/api/v1/ingest/upload",
            json!({ "filename": "notes.txt", "content": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_type() {
        let (status, _) = post(
            &app(),
            "/api/v1/ingest/upload",
            json!({ "filename": "archive.zip", "content": "PK" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let uri = format!("/api/v1/ingest/jobs/{}", uuid::Uuid::new_v4());
        let (status, body) = get(&app(), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
    }
}
