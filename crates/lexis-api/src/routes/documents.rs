use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use lexis_chunker::Chunk;
use lexis_common::types::DocumentId;
use lexis_store::models::{DocumentSummary, IndexStatus};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents))
        .route("/documents/{id}/chunks", get(document_chunks))
}

#[derive(Debug, Serialize)]
struct DocumentList {
    documents: Vec<DocumentSummary>,
    total: usize,
}

async fn list_documents(State(state): State<AppState>) -> Json<DocumentList> {
    let documents = state.store.list_documents().await;
    Json(DocumentList {
        total: documents.len(),
        documents,
    })
}

#[derive(Debug, Serialize)]
struct DocumentChunks {
    document_id: DocumentId,
    title: String,
    sentence_count: usize,
    index_status: IndexStatus,
    chunks: Vec<Chunk>,
}

async fn document_chunks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentChunks>, ApiError> {
    let doc = state
        .store
        .get_document(DocumentId(id))
        .await
        .ok_or(ApiError::NotFound)?;

    Ok(Json(DocumentChunks {
        document_id: doc.id,
        title: doc.title,
        sentence_count: doc.sentences.len(),
        index_status: doc.index_status,
        chunks: doc.chunks,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, get};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_empty_listing() {
        let (status, body) = get(&app(), "/api/v1/documents").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert!(body["documents"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_document_chunks() {
        let uri = format!("/api/v1/documents/{}/chunks", uuid::Uuid::new_v4());
        let (status, _) = get(&app(), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
