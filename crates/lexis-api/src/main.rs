use lexis_common::{config::AppConfig, telemetry};

mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting Lexis API server");

    let app_state = state::AppState::new(&config)?;

    if let Some(oracle) = app_state.oracle.as_deref() {
        match oracle.status().await {
            Ok(status) => tracing::info!(index_built = status.index_built, count = status.count, "Retrieval oracle reachable"),
            Err(e) => tracing::warn!(error = %e, "Retrieval oracle unreachable, continuing with local candidate pools"),
        }
    }

    let app = routes::create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
