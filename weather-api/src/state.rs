//! Application state shared across handlers

use std::sync::Arc;

use weather_core::WeatherProvider;

/// Built once at startup and cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream weather source, already translated into the public schema
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Self { weather }
    }
}
