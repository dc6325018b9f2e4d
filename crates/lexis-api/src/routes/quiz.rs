use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use lexis_common::types::DocumentId;
use lexis_scoring::MultipleChoiceQuestion;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const MAX_QUESTIONS: usize = 50;

pub fn routes() -> Router<AppState> {
    Router::new().route("/quiz", post(quiz))
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    document_id: Uuid,
    #[serde(default = "default_count")]
    count: usize,
    seed: Option<u64>,
}

fn default_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
struct QuizResponse {
    document_id: DocumentId,
    questions: Vec<MultipleChoiceQuestion>,
    total: usize,
}

async fn quiz(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    if req.count == 0 || req.count > MAX_QUESTIONS {
        return Err(ApiError::BadRequest(format!(
            "count must be between 1 and {MAX_QUESTIONS}"
        )));
    }

    let document_id = DocumentId(req.document_id);
    let questions = state
        .pipeline
        .build_quiz(document_id, req.count, state.selector, req.seed)
        .await?;

    Ok(Json(QuizResponse {
        document_id,
        total: questions.len(),
        questions,
    }))
}
