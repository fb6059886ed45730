use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::error::WeatherError;

/// Inbound lookup: a city name and an optional ISO country code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    /// City name, e.g. `Paris`.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city: String,

    /// Optional ISO 3166 country code, e.g. `FR`.
    #[validate(length(max = 2, message = "must be at most 2 characters"))]
    #[serde(default)]
    pub country_code: Option<String>,
}

impl WeatherQuery {
    /// Build a query, rejecting an empty city or a country code longer than 2 characters.
    pub fn new(
        city: impl Into<String>,
        country_code: Option<String>,
    ) -> Result<Self, WeatherError> {
        Self {
            city: city.into(),
            country_code,
        }
        .validated()
    }

    /// Run the field rules on an already-built query (e.g. one deserialized from a URL).
    pub fn validated(self) -> Result<Self, WeatherError> {
        self.validate()
            .map_err(|e| WeatherError::Validation(describe_validation_errors(&e)))?;
        Ok(self)
    }

    /// Location string understood by the provider: `city` or `city,CC`.
    pub fn location(&self) -> String {
        match self.country_code.as_deref() {
            Some(cc) if !cc.is_empty() => format!("{},{}", self.city, cc),
            _ => self.city.clone(),
        }
    }
}

/// Flatten `validator` output into `field: message; field: message`, sorted by field.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeatherData {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherResponse {
    pub city: String,
    pub country: String,
    /// When the reading was taken by the provider.
    pub timestamp: DateTime<Utc>,
    pub weather: CurrentWeatherData,
}

/// One day of a forecast. `date` is `YYYY-MM-DD` in the location's local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyForecastData {
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_day: f64,
    pub temp_night: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub precipitation_probability: Option<f64>,
}

/// Daily forecasts in provider order; the horizon length is whatever the provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub city: String,
    pub country: String,
    pub forecast: Vec<DailyForecastData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn sample_weather() -> CurrentWeatherData {
        CurrentWeatherData {
            temperature: 10.0,
            feels_like: 9.0,
            humidity: 80.0,
            pressure: 1015.0,
            wind_speed: 3.2,
            description: "clear sky".into(),
            icon: "01d".into(),
        }
    }

    #[test]
    fn query_accepts_city_with_and_without_country() {
        let q = WeatherQuery::new("Paris", Some("FR".into())).expect("valid query");
        assert_eq!(q.city, "Paris");
        assert_eq!(q.country_code.as_deref(), Some("FR"));

        assert!(WeatherQuery::new("Paris", None).is_ok());
        assert!(WeatherQuery::new("Paris", Some("F".into())).is_ok());
        assert!(WeatherQuery::new("Paris", Some(String::new())).is_ok());
    }

    #[test]
    fn query_rejects_empty_city() {
        let err = WeatherQuery::new("", None).unwrap_err();
        match err {
            WeatherError::Validation(msg) => assert_eq!(msg, "city: must not be empty"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn query_rejects_long_country_code() {
        let err = WeatherQuery::new("Paris", Some("FRA".into())).unwrap_err();
        match err {
            WeatherError::Validation(msg) => {
                assert_eq!(msg, "country_code: must be at most 2 characters")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn query_reports_every_failing_field() {
        let err = WeatherQuery::new("", Some("USA".into())).unwrap_err();
        let WeatherError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "city: must not be empty; country_code: must be at most 2 characters");
        // field order is stable regardless of HashMap iteration
    }

    #[test]
    fn query_does_not_normalize() {
        let q = WeatherQuery::new("  saint-étienne ", Some("fr".into())).expect("valid query");
        assert_eq!(q.city, "  saint-étienne ");
        assert_eq!(q.location(), "  saint-étienne ,fr");
    }

    #[test]
    fn location_skips_missing_or_empty_country() {
        assert_eq!(WeatherQuery::new("Oslo", None).unwrap().location(), "Oslo");
        assert_eq!(WeatherQuery::new("Oslo", Some(String::new())).unwrap().location(), "Oslo");
        assert_eq!(WeatherQuery::new("Oslo", Some("NO".into())).unwrap().location(), "Oslo,NO");
    }

    #[test]
    fn weather_response_survives_json() {
        let timestamp = NaiveDateTime::parse_from_str("2026-01-13T10:00:00", "%Y-%m-%dT%H:%M:%S")
            .expect("valid timestamp")
            .and_utc();

        let resp = WeatherResponse {
            city: "Paris".into(),
            country: "FR".into(),
            timestamp,
            weather: sample_weather(),
        };

        let json = serde_json::to_string(&resp).expect("serialize");
        assert!(json.contains("\"timestamp\":\"2026-01-13T10:00:00Z\""));

        let back: WeatherResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, resp);
    }

    #[test]
    fn missing_precipitation_serializes_as_null() {
        let day = DailyForecastData {
            date: "2026-01-13".into(),
            temp_min: 2.0,
            temp_max: 8.0,
            temp_day: 6.5,
            temp_night: 3.0,
            humidity: 70.0,
            wind_speed: 4.1,
            description: "light rain".into(),
            icon: "10d".into(),
            precipitation_probability: None,
        };

        let value = serde_json::to_value(&day).expect("serialize");
        assert!(value["precipitation_probability"].is_null());
    }
}
