//! Request handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use weather_core::{ForecastResponse, WeatherQuery, WeatherResponse};

use crate::{
    error::{ApiError, ErrorResponse},
    extract::ValidatedQuery,
    state::AppState,
};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Current conditions for a city.
///
/// GET /api/weather/current?city=Paris&country_code=FR
#[utoipa::path(
    get,
    path = "/api/weather/current",
    tag = "Weather",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Current conditions", body = WeatherResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Provider unreachable or bad payload", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(city = %query.city, country = ?query.country_code))]
pub async fn current_weather(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let weather = state
        .weather
        .get_current_weather(&query)
        .await
        .map_err(|e| ApiError::from_weather(e, "weather data"))?;

    debug!(city = %weather.city, country = %weather.country, "Current weather served");
    Ok(Json(weather))
}

/// Daily forecast for a city.
///
/// GET /api/weather/forecast?city=Paris&country_code=FR
#[utoipa::path(
    get,
    path = "/api/weather/forecast",
    tag = "Weather",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Daily forecast in provider order", body = ForecastResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Provider unreachable or bad payload", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(city = %query.city, country = ?query.country_code))]
pub async fn forecast(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<WeatherQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let forecast = state
        .weather
        .get_forecast(&query)
        .await
        .map_err(|e| ApiError::from_weather(e, "forecast data"))?;

    debug!(days = forecast.forecast.len(), "Forecast served");
    Ok(Json(forecast))
}
