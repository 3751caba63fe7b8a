mod config;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("upload directory: {0}")]
    Storage(#[from] services::storage::StorageError),
    #[error("server io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = config::ServerConfig::from_env()?;
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    let pictures = services::storage::FsObjectStore::open(config.upload_dir.clone()).await?;

    // Provider sign-in is optional: without the env vars only passwords work.
    let github = services::auth::GitHubProvider::from_env();
    if github.is_none() {
        tracing::warn!("GitHub OAuth not configured; provider sign-in disabled");
    }

    let port = config.port;
    let limiter = rate_limit::AuthRateLimiter::new(rate_limit::AuthLimits::from_env());
    let state = state::AppState::new(pool, config, github, Arc::new(pictures), limiter);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "liftbook listening");
    axum::serve(listener, app).await?;
    Ok(())
}
