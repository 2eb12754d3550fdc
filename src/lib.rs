pub mod app;
mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod server;

use config::AppConfig;
use error::AppError;
use infra::DbPool;
use server::AppState;
use tracing_subscriber::EnvFilter;

/// Install the console log subscriber. `log` records are bridged into it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
    {
        eprintln!("logging already initialized: {e}");
    }
}

pub async fn run() -> Result<(), AppError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    init_logging();

    let config = AppConfig::from_env()?;
    if config.database_url.is_none() {
        log::warn!("DATABASE_URL not set; reads return empty results and writes fail");
    }
    let pool = DbPool::new(config.database_url.clone());
    server::serve(AppState::new(pool, config)).await
}
