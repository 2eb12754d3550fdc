use super::{with_pool, AppJson, CreatedDto, IdReq, SuccessDto};
use crate::app::{
    country_create, country_delete, country_get, country_list, country_update, CountryCreateReq,
    CountryDto, CountryUpdateReq,
};
use crate::error::AppError;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn cmd_country_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CountryDto>>, AppError> {
    let countries = with_pool(&state, country_list).await?;
    Ok(Json(countries.unwrap_or_default()))
}

pub async fn cmd_country_get(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<IdReq>,
) -> Result<Json<Option<CountryDto>>, AppError> {
    let country = with_pool(&state, move |pool| country_get(pool, req.id)).await?;
    Ok(Json(country.ready().flatten()))
}

pub async fn cmd_country_create(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CountryCreateReq>,
) -> Result<Json<CreatedDto>, AppError> {
    let id = with_pool(&state, move |pool| country_create(pool, req)).await?;
    Ok(Json(CreatedDto { success: true, id }))
}

pub async fn cmd_country_update(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CountryUpdateReq>,
) -> Result<Json<Option<CountryDto>>, AppError> {
    let country = with_pool(&state, move |pool| country_update(pool, req)).await?;
    Ok(Json(country))
}

pub async fn cmd_country_delete(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<IdReq>,
) -> Result<Json<SuccessDto>, AppError> {
    with_pool(&state, move |pool| country_delete(pool, req.id)).await?;
    Ok(Json(SuccessDto::ok()))
}
