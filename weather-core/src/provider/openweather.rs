use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
    config::ProviderConfig,
    error::WeatherError,
    model::{CurrentWeatherData, DailyForecastData, ForecastResponse, WeatherQuery, WeatherResponse},
};

use super::WeatherProvider;

const MAX_FORECAST_DAYS: u8 = 16;

/// OpenWeather client mapping `/weather` and `/forecast/daily` onto the public schema.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
    forecast_days: u8,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("forecast_days", &self.forecast_days)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            forecast_days: config.forecast_days.clamp(1, MAX_FORECAST_DAYS),
            http,
        })
    }

    /// One GET against `endpoint`, classified into the error taxonomy and decoded as `T`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &WeatherQuery,
        extra: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let location = query.location();

        debug!(endpoint, location = %location, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .query(extra)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(location = %location, "OpenWeather does not know this location");
            return Err(WeatherError::NotFound { city: query.city.clone() });
        }

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "OpenWeather request failed");
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message: upstream_message(status, &body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: Option<OwSys>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: Option<String>,
    /// Shift from UTC in seconds.
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
    min: f64,
    max: f64,
    night: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    humidity: f64,
    speed: f64,
    weather: Vec<OwWeather>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwDailyResponse {
    city: OwCity,
    list: Vec<OwDailyEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, query), fields(city = %query.city))]
    async fn get_current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherResponse, WeatherError> {
        let raw: OwCurrentResponse = self.fetch("weather", query, &[]).await?;
        current_from_raw(raw, query)
    }

    #[instrument(skip(self, query), fields(city = %query.city))]
    async fn get_forecast(&self, query: &WeatherQuery) -> Result<ForecastResponse, WeatherError> {
        debug!(days = self.forecast_days, "Requesting daily forecast");
        let cnt = [("cnt", self.forecast_days.to_string())];
        let raw: OwDailyResponse = self.fetch("forecast/daily", query, &cnt).await?;
        forecast_from_raw(raw, query)
    }
}

fn current_from_raw(
    raw: OwCurrentResponse,
    query: &WeatherQuery,
) -> Result<WeatherResponse, WeatherError> {
    let condition = first_condition(raw.weather)?;

    let timestamp = DateTime::<Utc>::from_timestamp(raw.dt, 0).ok_or_else(|| {
        WeatherError::internal(format!("Observation time {} is out of range", raw.dt))
    })?;

    let country = raw
        .sys
        .and_then(|s| s.country)
        .or_else(|| query.country_code.clone())
        .unwrap_or_default();

    Ok(WeatherResponse {
        city: raw.name,
        country,
        timestamp,
        weather: CurrentWeatherData {
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.speed,
            description: condition.description,
            icon: condition.icon,
        },
    })
}

fn forecast_from_raw(
    raw: OwDailyResponse,
    query: &WeatherQuery,
) -> Result<ForecastResponse, WeatherError> {
    let offset = raw.city.timezone.unwrap_or(0);

    let forecast = raw
        .list
        .into_iter()
        .map(|entry| day_from_raw(entry, offset))
        .collect::<Result<Vec<_>, _>>()?;

    let country = raw
        .city
        .country
        .or_else(|| query.country_code.clone())
        .unwrap_or_default();

    Ok(ForecastResponse {
        city: raw.city.name,
        country,
        forecast,
    })
}

fn day_from_raw(entry: OwDailyEntry, offset: i64) -> Result<DailyForecastData, WeatherError> {
    let date = entry
        .dt
        .checked_add(offset)
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .ok_or_else(|| {
            WeatherError::internal(format!("Forecast time {} is out of range", entry.dt))
        })?
        .format("%Y-%m-%d")
        .to_string();

    let condition = first_condition(entry.weather)?;

    Ok(DailyForecastData {
        date,
        temp_min: entry.temp.min,
        temp_max: entry.temp.max,
        temp_day: entry.temp.day,
        temp_night: entry.temp.night,
        humidity: entry.humidity,
        wind_speed: entry.speed,
        description: condition.description,
        icon: condition.icon,
        precipitation_probability: entry.pop,
    })
}

fn first_condition(weather: Vec<OwWeather>) -> Result<OwWeather, WeatherError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::internal("Provider payload has no weather condition"))
}

/// Human-readable reason for a failed upstream call.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<OwErrorBody>(body) {
        return parsed.message;
    }

    if body.trim().is_empty() {
        return status.canonical_reason().unwrap_or("no response body").to_string();
    }

    truncate_body(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
