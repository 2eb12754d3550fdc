//! HTTP server: shared state, procedure routes, graceful shutdown.

use crate::app::CountryDirectory;
use crate::commands::{city, country, external_data};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::DbPool;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub directory: CountryDirectory,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let directory = CountryDirectory::new(config.country_api_base.clone());
        Self {
            pool,
            config,
            directory,
        }
    }

    /// Owner id that sign-in handlers pass to `user_upsert`.
    pub fn owner_open_id(&self) -> Option<&str> {
        self.config.owner_open_id.as_deref()
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        log::warn!("CORS: permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router. Procedures are `POST /api/<group>.<name>` with a JSON body.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_permissive);
    Router::new()
        .route("/health", get(health))
        .route("/api/countries.list", post(country::cmd_country_list))
        .route("/api/countries.getById", post(country::cmd_country_get))
        .route("/api/countries.create", post(country::cmd_country_create))
        .route("/api/countries.update", post(country::cmd_country_update))
        .route("/api/countries.delete", post(country::cmd_country_delete))
        .route("/api/cities.list", post(city::cmd_city_list))
        .route("/api/cities.getByCountry", post(city::cmd_city_by_country))
        .route("/api/cities.getById", post(city::cmd_city_get))
        .route("/api/cities.create", post(city::cmd_city_create))
        .route("/api/cities.update", post(city::cmd_city_update))
        .route("/api/cities.delete", post(city::cmd_city_delete))
        .route(
            "/api/externalData.countryLookup",
            post(external_data::cmd_country_lookup),
        )
        .route("/api/externalData.weather", post(external_data::cmd_weather))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C / SIGTERM.
pub async fn serve(state: AppState) -> Result<(), AppError> {
    let bind_addr = state.config.bind_addr;
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(bind_addr).await?;
    log::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received");
}
