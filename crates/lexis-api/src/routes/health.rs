use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// The service is usable without the oracle, so an unreachable oracle only
/// degrades the status.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let oracle = match state.oracle.as_deref() {
        None => json!({ "state": "disabled" }),
        Some(oracle) => match oracle.status().await {
            Ok(status) => json!({
                "state": "ok",
                "index_built": status.index_built,
                "count": status.count,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Oracle health check failed");
                json!({ "state": "error", "error": e.to_string() })
            }
        },
    };

    let status = if oracle["state"] == "error" { "degraded" } else { "ok" };

    Json(json!({
        "status": status,
        "services": {
            "oracle": oracle,
        }
    }))
}
