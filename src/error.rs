use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::Location;

/// Every way a weather lookup can fail short of a reading.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please set OPENWEATHER_API_KEY environment variable")]
    MissingApiKey,

    #[error("City name is required")]
    EmptyCity,

    #[error("Latitude must be between -90 and 90 degrees")]
    InvalidLatitude(f64),

    #[error("Longitude must be between -180 and 180 degrees")]
    InvalidLongitude(f64),

    #[error("{}", not_found_message(.0))]
    NotFound(Location),

    #[error("The provided OpenWeatherMap API key is invalid")]
    Unauthorized,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Weather API request timed out. Please try again.")]
    Timeout,

    #[error("Weather API returned status {0}")]
    Upstream(StatusCode),

    #[error("Weather API response contained no weather conditions")]
    MissingConditions,

    #[error("HTTP client has been shut down")]
    ClientClosed,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

fn not_found_message(location: &Location) -> String {
    match location {
        Location::City { city, .. } => format!(
            "Could not find weather data for '{}'. Please check the city name and try again.",
            city
        ),
        Location::Coordinates { .. } => format!(
            "Could not find weather data for coordinates ({}). Please check the values and try again.",
            location
        ),
    }
}

impl WeatherError {
    /// Short label reported in the `error` field of the payload.
    pub fn title(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => "API key not configured",
            WeatherError::EmptyCity => "Invalid city",
            WeatherError::InvalidLatitude(_) => "Invalid latitude",
            WeatherError::InvalidLongitude(_) => "Invalid longitude",
            WeatherError::NotFound(Location::City { .. }) => "City not found",
            WeatherError::NotFound(Location::Coordinates { .. }) => "Location not found",
            WeatherError::Unauthorized => "Invalid API key",
            WeatherError::RateLimited => "Rate limit exceeded",
            WeatherError::Timeout => "Request timeout",
            WeatherError::Upstream(_) => "Weather API error",
            WeatherError::MissingConditions
            | WeatherError::ClientClosed
            | WeatherError::Transport(_)
            | WeatherError::Parse(_) => "Unexpected error",
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            WeatherError::NotFound(Location::City { .. }) => {
                Some("Try including the country code (e.g., 'London,GB')")
            }
            WeatherError::MissingApiKey => Some("Get a free API key from https://openweathermap.org/api"),
            _ => None,
        }
    }

    /// True when the failure was detected before any request was sent.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WeatherError::EmptyCity | WeatherError::InvalidLatitude(_) | WeatherError::InvalidLongitude(_)
        )
    }

    /// JSON payload handed back to the calling agent.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "error": self.title(),
            "message": self.to_string(),
            "status": "error",
        });
        if let Some(suggestion) = self.suggestion() {
            payload["suggestions"] = Value::from(suggestion);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_payload_names_the_city() {
        let err = WeatherError::NotFound(Location::City {
            city: "Atlantis".into(),
            country_code: None,
        });
        let payload = err.to_payload();

        assert_eq!(payload["error"], "City not found");
        assert_eq!(
            payload["message"],
            "Could not find weather data for 'Atlantis'. Please check the city name and try again."
        );
        assert_eq!(payload["suggestions"], "Try including the country code (e.g., 'London,GB')");
        assert_eq!(payload["status"], "error");
    }

    #[test]
    fn upstream_error_carries_status_text() {
        let err = WeatherError::Upstream(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Weather API returned status 502 Bad Gateway");
        assert_eq!(err.to_payload()["error"], "Weather API error");
    }

    #[test]
    fn payload_without_suggestion_omits_field() {
        let payload = WeatherError::RateLimited.to_payload();
        assert!(payload.get("suggestions").is_none());
        assert_eq!(payload["message"], "API rate limit exceeded. Please try again later.");
    }

    #[test]
    fn coordinate_errors_are_invalid_input() {
        assert!(WeatherError::InvalidLatitude(91.0).is_invalid_input());
        assert!(WeatherError::InvalidLongitude(-181.0).is_invalid_input());
        assert!(!WeatherError::Timeout.is_invalid_input());
    }
}
