//! API server: reads env config, prepares storage and the upload dir, serves the router.

use std::sync::Arc;
use tg_market_api::{app_router, connect, ensure_database_exists, ensure_schema, AppConfig, AppState, PgProductRepository};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tg_market_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "startup failed");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(dir = %config.upload_dir.display(), "upload dir ready");

    if let Err(e) = ensure_database_exists(&config.database_url).await {
        tracing::warn!(error = %e, "could not check or create database; connecting anyway");
    }
    let pool = connect(&config.database_url, config.db_max_connections).await?;
    ensure_schema(&pool).await?;

    let state = AppState::new(
        Arc::new(PgProductRepository::new(pool)),
        config.admin_token.as_str(),
        config.upload_dir.clone(),
    );
    let app = app_router(state, &config.allowed_origins);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
