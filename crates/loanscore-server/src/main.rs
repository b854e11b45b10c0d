mod app;
mod dto;
mod error;
mod handlers;
mod services;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use loanscore_config::Settings;
use loanscore_core::ScoringArtifact;
use loanscore_engine::load_artifact;
use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env()?;

    let artifact = load_artifact(&settings.model_path).with_context(|| {
        format!("failed to load model from {}", settings.model_path.display())
    })?;
    info!("Model ready: {}", artifact.describe());

    let addr = settings.bind_addr();
    let state = Arc::new(AppState::new(Arc::new(artifact), settings));
    let app = app::router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
