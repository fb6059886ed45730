//! Core library for the weather API.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The public request/response schema
//! - The upstream provider contract and its OpenWeather implementation,
//!   which translates provider payloads and failures into that schema
//!
//! It is used by `weather-api`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use model::{
    CurrentWeatherData, DailyForecastData, ForecastResponse, WeatherQuery, WeatherResponse,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
