//! API error handling
//!
//! Maps [`WeatherError`] kinds onto HTTP statuses. Internal failures are
//! logged in full and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use weather_core::WeatherError;

/// Detail sent for internal failures; the real cause only goes to the log.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Carries the provider's own status code so it can be mirrored.
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body, `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    /// Translate a provider failure. `resource` names what was being fetched,
    /// e.g. `"weather data"`.
    pub fn from_weather(err: WeatherError, resource: &str) -> Self {
        match err {
            WeatherError::Validation(msg) => Self::Validation(msg),
            WeatherError::NotFound { city } => Self::NotFound(format!(
                "City '{city}' not found. Check the spelling or add a country code."
            )),
            WeatherError::Upstream { status, message } => {
                warn!(status, %message, "Weather provider rejected the request");
                Self::Upstream {
                    status,
                    message: format!(
                        "Failed to retrieve {resource}: provider returned HTTP {status}: {message}"
                    ),
                }
            }
            WeatherError::Transport(msg) => {
                warn!(error = %msg, "Weather provider unreachable");
                Self::Connection(format!("Failed to connect to the weather provider: {msg}"))
            }
            WeatherError::Internal(msg) => {
                error!(error = %msg, "Failed to build {resource}");
                Self::Internal(msg)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Connection(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Upstream { message: msg, .. }
            | Self::Connection(msg) => msg,
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
