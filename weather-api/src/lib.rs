//! HTTP layer of the weather API.
//!
//! Exposes `/api/health`, `/api/weather/current` and `/api/weather/forecast`
//! on top of a [`weather_core::WeatherProvider`], with OpenAPI docs at
//! `/api/docs` and `/api/openapi.json`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use extract::ValidatedQuery;
pub use openapi::ApiDoc;
pub use routes::{build_app, create_router};
pub use state::AppState;
