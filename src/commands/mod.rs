//! Procedure handlers (DTO boundary).

pub mod city;
pub mod country;
pub mod external_data;

use crate::error::AppError;
use crate::infra::DbPool;
use crate::server::AppState;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JSON body extractor whose rejections are `VALIDATION_ERROR` responses.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Deserialize)]
pub struct IdReq {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedDto {
    pub success: bool,
    pub id: i64,
}

/// Run SQLite work off the async runtime.
pub(crate) async fn with_pool<T, F>(state: &Arc<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&DbPool) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.pool))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}
