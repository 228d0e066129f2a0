use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use insurenav_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{profile_worker, InteractionStore, JsonFileStore, RecommendationService, SeedStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurenav_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    // Reject bad scoring parameters before anything is loaded
    let recommender_config = config.recommender()?;

    let store: Arc<dyn InteractionStore> = match &config.snapshot_path {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => Arc::new(SeedStore),
    };

    let recommender = RecommendationService::new(
        store,
        config.active_viewer_id,
        config.initial_profile(),
        recommender_config,
    )
    .await
    .context("Failed to initialize recommender")?;

    let (profile_queue, worker_handle) = profile_worker::spawn(recommender.clone());
    let app = create_router(AppState::new(recommender, profile_queue));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    worker_handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
