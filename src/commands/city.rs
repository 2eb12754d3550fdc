use super::{with_pool, AppJson, CreatedDto, IdReq, SuccessDto};
use crate::app::{
    city_create, city_delete, city_get, city_list, city_list_by_country, city_update,
    CityCreateReq, CityDto, CityUpdateReq,
};
use crate::error::AppError;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CityByCountryReq {
    #[serde(rename = "idPais")]
    pub country_id: i64,
}

pub async fn cmd_city_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityDto>>, AppError> {
    let cities = with_pool(&state, city_list).await?;
    Ok(Json(cities.unwrap_or_default()))
}

pub async fn cmd_city_by_country(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CityByCountryReq>,
) -> Result<Json<Vec<CityDto>>, AppError> {
    let cities = with_pool(&state, move |pool| city_list_by_country(pool, req.country_id)).await?;
    Ok(Json(cities.unwrap_or_default()))
}

pub async fn cmd_city_get(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<IdReq>,
) -> Result<Json<Option<CityDto>>, AppError> {
    let city = with_pool(&state, move |pool| city_get(pool, req.id)).await?;
    Ok(Json(city.ready().flatten()))
}

pub async fn cmd_city_create(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CityCreateReq>,
) -> Result<Json<CreatedDto>, AppError> {
    let id = with_pool(&state, move |pool| city_create(pool, req)).await?;
    Ok(Json(CreatedDto { success: true, id }))
}

pub async fn cmd_city_update(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CityUpdateReq>,
) -> Result<Json<Option<CityDto>>, AppError> {
    let city = with_pool(&state, move |pool| city_update(pool, req)).await?;
    Ok(Json(city))
}

pub async fn cmd_city_delete(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<IdReq>,
) -> Result<Json<SuccessDto>, AppError> {
    with_pool(&state, move |pool| city_delete(pool, req.id)).await?;
    Ok(Json(SuccessDto::ok()))
}
