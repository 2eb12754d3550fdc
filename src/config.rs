//! Process configuration from environment variables.

use crate::app::DEFAULT_COUNTRY_API_BASE;
use crate::error::AppError;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string. `None` runs without a database.
    pub database_url: Option<String>,
    /// External login id promoted to admin on upsert. Read through
    /// `AppState::owner_open_id` by library callers of `user_upsert`.
    pub owner_open_id: Option<String>,
    pub bind_addr: SocketAddr,
    pub country_api_base: String,
    /// Allow any CORS origin instead of localhost only.
    pub cors_permissive: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR {bind_raw:?}: {e}")))?;

        let cors_permissive = get("CORS_PERMISSIVE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url: get("DATABASE_URL"),
            owner_open_id: get("OWNER_OPEN_ID"),
            bind_addr,
            country_api_base: get("COUNTRY_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_COUNTRY_API_BASE.to_string()),
            cors_permissive,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            owner_open_id: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            country_api_base: DEFAULT_COUNTRY_API_BASE.to_string(),
            cors_permissive: false,
        }
    }
}
