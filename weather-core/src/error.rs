use thiserror::Error;

/// Failure modes of a weather lookup.
///
/// Every error raised while talking to the upstream provider or while mapping
/// its payload is reported as exactly one of these kinds; callers decide how
/// each kind is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The query was rejected before any network call was made.
    #[error("Invalid query: {0}")]
    Validation(String),

    /// The provider does not know the requested location.
    #[error("Location '{city}' not found")]
    NotFound { city: String },

    /// The provider answered with a non-success status other than 404.
    #[error("Weather provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never completed (DNS, connect, timeout, reset).
    #[error("Could not reach weather provider: {0}")]
    Transport(String),

    /// Anything else, typically a payload that does not have the expected shape.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WeatherError {
    pub fn internal(msg: impl Into<String>) -> Self {
        WeatherError::Internal(msg.into())
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key, keep it out of the message.
        WeatherError::Transport(e.without_url().to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Internal(format!("Unexpected provider payload: {e}"))
    }
}
