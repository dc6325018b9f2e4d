use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use lexis_oracle_client::neighbours_or_empty;
use lexis_scoring::{
    assemble_choices, breakdown, AnswerGrader, DistractorSelector, Grade, SimilarityBand,
    SimilarityBreakdown, SimilarityScore,
};
use lexis_text::{extract_phrases, normalize, split_sentences};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Neighbour chunks requested when widening a distractor pool.
const NEIGHBOUR_COUNT: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/similarity", post(similarity))
        .route("/grade", post(grade))
        .route("/distractors", post(distractors))
}

#[derive(Debug, Deserialize)]
struct SimilarityRequest {
    a: String,
    b: String,
}

#[derive(Debug, Serialize)]
struct SimilarityResponse {
    score: SimilarityScore,
    breakdown: SimilarityBreakdown,
}

async fn similarity(Json(req): Json<SimilarityRequest>) -> Json<SimilarityResponse> {
    let breakdown = breakdown(&req.a, &req.b);
    Json(SimilarityResponse {
        score: breakdown.combined(),
        breakdown,
    })
}

#[derive(Debug, Deserialize)]
struct GradeRequest {
    response: String,
    #[serde(default)]
    expected_answers: Vec<String>,
    explanation: Option<String>,
    #[serde(default = "default_max_points")]
    max_points: u32,
}

fn default_max_points() -> u32 {
    1
}

async fn grade(Json(req): Json<GradeRequest>) -> Result<Json<Grade>, ApiError> {
    let has_reference = req.expected_answers.iter().any(|a| !a.trim().is_empty())
        || req.explanation.as_deref().is_some_and(|e| !e.trim().is_empty());
    if !has_reference {
        return Err(ApiError::BadRequest(
            "expected_answers or explanation is required".to_string(),
        ));
    }

    let grade = AnswerGrader.grade(
        &req.response,
        &req.expected_answers,
        req.explanation.as_deref(),
        req.max_points,
    );
    tracing::debug!(score = grade.score.value(), correct = grade.correct, "Graded response");
    Ok(Json(grade))
}

#[derive(Debug, Deserialize)]
struct DistractorRequest {
    answer: String,
    #[serde(default)]
    candidates: Vec<String>,
    /// Overrides the configured band for this request.
    min_sim: Option<f64>,
    max_sim: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct DistractorResponse {
    distractors: Vec<String>,
    choices: Vec<String>,
    answer_index: usize,
}

async fn distractors(
    State(state): State<AppState>,
    Json(req): Json<DistractorRequest>,
) -> Result<Json<DistractorResponse>, ApiError> {
    if req.answer.trim().is_empty() {
        return Err(ApiError::BadRequest("answer cannot be empty".to_string()));
    }

    let configured = state.selector.band();
    let band = SimilarityBand::new(
        req.min_sim.unwrap_or(configured.min()),
        req.max_sim.unwrap_or(configured.max()),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut pool = req.candidates;
    let neighbours = neighbours_or_empty(state.oracle.as_deref(), &req.answer, NEIGHBOUR_COUNT).await;
    pool.extend(
        neighbours
            .iter()
            .flat_map(|n| extract_phrases(&split_sentences(&normalize(&n.text))))
            .map(|p| p.text),
    );

    let mut rng = match req.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let distractors = DistractorSelector::new(band).select(&req.answer, &pool);
    let choice_set = assemble_choices(&req.answer, distractors.clone(), &mut rng);

    Ok(Json(DistractorResponse {
        distractors,
        choices: choice_set.choices,
        answer_index: choice_set.answer_index,
    }))
}
