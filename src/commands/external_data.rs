use super::AppJson;
use crate::app::{weather_lookup, CountryInfo, CountryLookupReq, WeatherInfo, WeatherReq};
use crate::error::AppError;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// Never fails: misses and upstream errors both yield `null`.
pub async fn cmd_country_lookup(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CountryLookupReq>,
) -> Json<Option<CountryInfo>> {
    Json(state.directory.lookup(&req.country_name).await)
}

pub async fn cmd_weather(
    AppJson(req): AppJson<WeatherReq>,
) -> Result<Json<WeatherInfo>, AppError> {
    Ok(Json(weather_lookup(&req)?))
}
