//! Weather API handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::weather::WeatherSnapshot;

/// Weather query parameters
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// GET /api/weather?city=NAME
/// Never fails: upstream errors are masked by a synthetic snapshot
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherSnapshot> {
    Json(state.weather.snapshot(query.city.as_deref()).await)
}
