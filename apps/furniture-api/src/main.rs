use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    // The database container may still be starting
    let retry = RetryConfig::default()
        .with_max_retries(5)
        .with_initial_delay(Duration::from_millis(500));
    let mongo_client = database::mongodb::connect_with_retry(&config.mongodb, retry).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    api::items::init_indexes(&state).await?;

    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    let app = router.merge(health_router(state.config.app));
    let mongo_client = state.mongo_client.clone();

    info!("Starting Furniture API (30s shutdown timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Furniture API shutdown complete");
    Ok(())
}
