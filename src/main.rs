use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use booking_flow::config::AppConfig;
use booking_flow::db;
use booking_flow::handlers;
use booking_flow::services::SeedCatalog;
use booking_flow::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        max_people = config.limits.max_people,
        max_extra_people = config.limits.max_extra_people,
        "booking limits loaded"
    );

    let conn = db::init_db(&config.database_url)
        .with_context(|| format!("opening state store at {}", config.database_url))?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::init(config, conn, &SeedCatalog).await?);

    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
