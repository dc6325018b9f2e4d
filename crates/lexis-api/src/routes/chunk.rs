use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use lexis_chunker::{Chunk, ChunkerConfig, ChunkingStrategy, OffsetMode, SemanticChunker};
use lexis_text::RawPage;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/chunk", post(chunk))
}

/// Either `text` or `pages` must be given. Pages go through header/footer
/// removal before chunking.
#[derive(Debug, Deserialize)]
struct ChunkRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pages: Option<Vec<RawPage>>,
    chunk_chars: Option<usize>,
    overlap_chars: Option<usize>,
    offset_mode: Option<OffsetMode>,
}

#[derive(Debug, Serialize)]
struct ChunkResponse {
    chunks: Vec<Chunk>,
    total: usize,
}

async fn chunk(
    State(state): State<AppState>,
    Json(req): Json<ChunkRequest>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let config = ChunkerConfig {
        chunk_chars: req.chunk_chars.unwrap_or(state.chunker.chunk_chars),
        overlap_chars: req.overlap_chars.unwrap_or(state.chunker.overlap_chars),
        offset_mode: req.offset_mode.unwrap_or(state.chunker.offset_mode),
    };
    if config.chunk_chars == 0 {
        return Err(ApiError::BadRequest("chunk_chars must be positive".to_string()));
    }

    let chunker = SemanticChunker::with_config(config);
    let chunks = match (req.pages, req.text) {
        (Some(pages), _) => chunker.chunk_pages(&pages),
        (None, Some(text)) => chunker.chunk(&text),
        (None, None) => {
            return Err(ApiError::BadRequest("either text or pages is required".to_string()));
        }
    };

    tracing::debug!(chunk_count = chunks.len(), ?config, "Chunked request text");
    Ok(Json(ChunkResponse {
        total: chunks.len(),
        chunks,
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, post};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_chunk_text_with_overrides() {
        let text = "The mitochondria is the powerhouse of the cell. It produces ATP through respiration.";
        let (status, body) = post(
            &app(),
            "/api/v1/chunk",
            json!({ "text": text, "chunk_chars": 50, "overlap_chars": 10 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["chunks"][0]["id"], "0-47");
        assert_eq!(body["chunks"][1]["id"], "37-73");
        assert_eq!(body["chunks"][0]["startSentence"], 0);
    }

    #[tokio::test]
    async fn test_chunk_pages_strips_running_headers() {
        let pages = json!([
            "Chapter 1\nMitochondria produce ATP.\n- 1 -",
            "Chapter 1\nChloroplasts capture light.\n- 1 -",
        ]);
        let (status, body) = post(&app(), "/api/v1/chunk", json!({ "pages": pages })).await;
        assert_eq!(status, StatusCode::OK);
        let text = body["chunks"][0]["text"].as_str().unwrap();
        assert_eq!(text, "Mitochondria produce ATP. Chloroplasts capture light.");
    }

    #[tokio::test]
    async fn test_chunk_requires_input() {
        let (status, _) = post(&app(), "/api/v1/chunk", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chunk_rejects_zero_budget() {
        let (status, _) = post(&app(), "/api/v1/chunk", json!({ "text": "A b c.", "chunk_chars": 0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
