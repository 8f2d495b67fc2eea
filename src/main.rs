mod comments;
mod config;
mod db;
mod error;
mod models;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use state::AppState;
use storage::MySqlStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = db::init_db(&config)
        .await
        .context("initializing database")?;
    tracing::info!("Database initialized");

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(Arc::new(MySqlStorage::new(pool)), config);
    let app = routes::app(state);

    tracing::info!("Server running on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
