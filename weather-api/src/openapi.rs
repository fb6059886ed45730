//! OpenAPI documentation
//!
//! Serves the generated document at `/api/openapi.json`, Swagger UI at
//! `/api/docs` and ReDoc at `/docs`.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::{Router, response::Html, routing::get};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{error::ErrorResponse, handlers, state::AppState};

pub const OPENAPI_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CY Weather API",
        version = "0.1.0",
        description = "API for CY Weather application"
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Weather", description = "Current weather and daily forecasts for a city")
    ),
    paths(
        handlers::health_check,
        handlers::current_weather,
        handlers::forecast,
    ),
    components(
        schemas(
            handlers::HealthResponse,
            weather_core::WeatherQuery,
            weather_core::CurrentWeatherData,
            weather_core::WeatherResponse,
            weather_core::DailyForecastData,
            weather_core::ForecastResponse,
            ErrorResponse,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Documentation routes, merged into the main router
pub fn openapi_routes() -> Router<AppState> {
    let redoc = Redoc::with_url("/docs", ApiDoc::openapi());

    Router::new()
        .route("/docs", get(|| async move { Html(redoc.to_html()) }))
        .merge(SwaggerUi::new("/api/docs").url(OPENAPI_PATH, ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_title_and_version() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "CY Weather API");
        assert_eq!(doc.info.version, "0.1.0");
    }

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/api/health"));
        assert!(paths.contains(&"/api/weather/current"));
        assert!(paths.contains(&"/api/weather/forecast"));
    }

    #[test]
    fn document_has_both_tags() {
        let doc = ApiDoc::openapi();
        let tags: Vec<&str> = doc
            .tags
            .as_ref()
            .map(|t| t.iter().map(|tag| tag.name.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(tags, ["Health", "Weather"]);
    }

    #[test]
    fn weather_query_is_documented_as_query_params() {
        let json = serde_json::to_value(ApiDoc::openapi()).expect("serialize");
        let params = json["paths"]["/api/weather/current"]["get"]["parameters"]
            .as_array()
            .expect("parameters");

        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        assert_eq!(names, ["city", "country_code"]);
        assert!(params.iter().all(|p| p["in"] == "query"));
    }
}
