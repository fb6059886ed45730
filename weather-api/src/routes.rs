//! Route definitions

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use weather_core::ServerConfig;

use crate::{handlers, openapi::openapi_routes, state::AppState};

/// Create the router with every endpoint under `/api`, plus the API docs
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/weather/current", get(handlers::current_weather))
        .route("/weather/forecast", get(handlers::forecast));

    Router::new()
        .nest("/api", api)
        .merge(openapi_routes())
        .with_state(state)
}

/// Router plus request tracing and CORS, as served by the binary
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
}

/// Any origin when none are configured, otherwise only the listed ones
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
