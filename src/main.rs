use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ankora_backend::core::logging;
use ankora_backend::server;
use ankora_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize()?;
    logging::init(&state.settings.server.log_dir);

    if let Err(err) = state.corpus.refresh().await {
        tracing::warn!(
            "Initial corpus load failed: {}; serving without a snapshot until a refresh succeeds",
            err
        );
    }

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(state.settings.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
