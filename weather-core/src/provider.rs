use crate::{
    Config, ForecastResponse, WeatherError, WeatherQuery, WeatherResponse,
    provider::openweather::OpenWeatherProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Upstream weather source, already translated into the public schema.
///
/// Implementations perform exactly one upstream round trip per call and
/// report every failure as a [`WeatherError`] kind; they never return a
/// partially filled response.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherResponse, WeatherError>;

    async fn get_forecast(&self, query: &WeatherQuery) -> Result<ForecastResponse, WeatherError>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.provider_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the weather provider.\n\
                 Hint: run `weather-api configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.provider)
        .context("Failed to initialise the OpenWeather client")?;

    Ok(Arc::new(provider))
}
