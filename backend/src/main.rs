//! Rice Inspection Platform - Backend Server

use std::{net::SocketAddr, sync::Arc};

use rice_inspection_backend::{
    create_app, external::StandardsClient, storage::JsonFileStore, AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rice_server=debug,rice_inspection_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Rice Inspection Server");
    tracing::info!("Environment: {}", config.environment);

    // Open inspection storage
    tracing::info!("Opening data file {}", config.storage.data_file.display());
    let store = JsonFileStore::open(&config.storage.data_file).await?;

    let standards = StandardsClient::new(&config.standards)?;
    if let Err(e) = standards.list().await {
        // Retried on the first request that needs standards
        tracing::warn!("Standards not available at startup: {}", e);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(Arc::new(store), standards, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
