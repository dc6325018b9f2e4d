pub mod chunk;
pub mod documents;
pub mod health;
pub mod ingest;
pub mod quiz;
pub mod scoring;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(ingest::routes())
        .merge(documents::routes())
        .merge(chunk::routes())
        .merge(scoring::routes())
        .merge(quiz::routes())
}
