use anyhow::{Context, Result};
use std::time::Duration;

use crate::constants::{
    DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_API_URL, ENV_DEFAULT_UNITS, ENV_TIMEOUT,
    OPENWEATHER_API_URL,
};
use crate::models::Units;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub default_units: Units,
    pub timeout: Duration,
    pub api_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_units: Units::Celsius,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_url: OPENWEATHER_API_URL.to_string(),
        }
    }
}

impl WeatherConfig {
    /// Load configuration from the process environment.
    ///
    /// - `OPENWEATHER_API_KEY` (optional) - OpenWeatherMap credential
    /// - `DEFAULT_UNITS` (optional, default celsius) - celsius, fahrenheit or kelvin
    /// - `WEATHER_API_TIMEOUT` (optional, default 10) - request timeout in seconds
    /// - `OPENWEATHER_API_URL` (optional) - endpoint override
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let default_units = lookup(ENV_DEFAULT_UNITS)
            .map(|units| Units::parse_lenient(&units))
            .unwrap_or_default();

        let timeout_secs = match lookup(ENV_TIMEOUT) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT} must be a whole number of seconds, got '{value}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let api_url = lookup(ENV_API_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| OPENWEATHER_API_URL.to_string());

        Ok(Self {
            api_key,
            default_units,
            timeout: Duration::from_secs(timeout_secs),
            api_url,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = WeatherConfig::from_lookup(lookup_from(&[])).unwrap();

        assert!(!cfg.has_api_key());
        assert_eq!(cfg.default_units, Units::Celsius);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.api_url, OPENWEATHER_API_URL);
    }

    #[test]
    fn reads_all_variables() {
        let cfg = WeatherConfig::from_lookup(lookup_from(&[
            ("OPENWEATHER_API_KEY", "abc123"),
            ("DEFAULT_UNITS", "fahrenheit"),
            ("WEATHER_API_TIMEOUT", "3"),
            ("OPENWEATHER_API_URL", "http://localhost:9999/weather"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.default_units, Units::Fahrenheit);
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert_eq!(cfg.api_url, "http://localhost:9999/weather");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = WeatherConfig::from_lookup(lookup_from(&[("OPENWEATHER_API_KEY", "  ")])).unwrap();
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn unknown_default_units_fall_back_to_celsius() {
        let cfg = WeatherConfig::from_lookup(lookup_from(&[("DEFAULT_UNITS", "rankine")])).unwrap();
        assert_eq!(cfg.default_units, Units::Celsius);
    }

    #[test]
    fn malformed_timeout_is_an_error() {
        let err = WeatherConfig::from_lookup(lookup_from(&[("WEATHER_API_TIMEOUT", "soon")])).unwrap_err();
        assert!(err.to_string().contains("WEATHER_API_TIMEOUT"));
    }
}
