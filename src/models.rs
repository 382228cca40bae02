use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

// ============================================================================
// Units
// ============================================================================

/// Temperature scale requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Units {
    /// Parses a unit name, silently falling back to celsius for anything unrecognized.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "fahrenheit" => Units::Fahrenheit,
            "kelvin" => Units::Kelvin,
            _ => Units::Celsius,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Celsius => "celsius",
            Units::Fahrenheit => "fahrenheit",
            Units::Kelvin => "kelvin",
        }
    }

    /// Unit system the upstream API is asked for.
    pub fn api_units(&self) -> ApiUnits {
        match self {
            Units::Celsius => ApiUnits::Metric,
            Units::Fahrenheit => ApiUnits::Imperial,
            Units::Kelvin => ApiUnits::Standard,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Units::Celsius => 'C',
            Units::Fahrenheit => 'F',
            Units::Kelvin => 'K',
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native unit systems of the OpenWeatherMap API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiUnits {
    Metric,
    Imperial,
    Standard,
}

impl ApiUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiUnits::Metric => "metric",
            ApiUnits::Imperial => "imperial",
            ApiUnits::Standard => "standard",
        }
    }
}

// ============================================================================
// Locations and upstream queries
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City {
        city: String,
        country_code: Option<String>,
    },
    Coordinates {
        latitude: f64,
        longitude: f64,
    },
}

impl Location {
    /// Query parameters identifying this location.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::City { city, country_code } => {
                let q = match country_code {
                    Some(code) => format!("{},{}", city, code),
                    None => city.clone(),
                };
                vec![("q", q)]
            }
            Location::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City { city, .. } => f.write_str(city),
            Location::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{}, {}", latitude, longitude),
        }
    }
}

/// One request against the current weather endpoint, minus the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: Location,
    pub units: ApiUnits,
}

impl WeatherQuery {
    pub fn new(location: Location, units: ApiUnits) -> Self {
        Self { location, units }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.location.query_pairs();
        pairs.push(("units", self.units.as_str().to_string()));
        pairs
    }
}

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Wind,
    pub sys: SysInfo,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    /// Passed through as received; OpenWeatherMap reports whole degrees.
    #[serde(default = "zero")]
    pub deg: Number,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            speed: 0.0,
            deg: zero(),
        }
    }
}

fn zero() -> Number {
    Number::from(0)
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

// ============================================================================
// Tool Output Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Normalized current conditions returned by the lookup tools.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub units: Units,
    pub description: String,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: Number,
    pub sunrise: String,
    pub sunset: String,
    pub timestamp: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSummary {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub summary: String,
    pub motivation: String,
    pub timestamp: String,
    pub status: &'static str,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetCurrentWeatherRequest {
    /// City name, e.g. "London"
    pub city: String,
    /// ISO 3166 country code, e.g. "GB" or "US"
    #[serde(default)]
    pub country_code: Option<String>,
    /// celsius, fahrenheit or kelvin
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherByCoordinatesRequest {
    /// Latitude between -90 and 90
    pub latitude: f64,
    /// Longitude between -180 and 180
    pub longitude: f64,
    /// celsius, fahrenheit or kelvin
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherSummaryRequest {
    /// City name, e.g. "Paris"
    pub city: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_parse_is_lenient() {
        assert_eq!(Units::parse_lenient("fahrenheit"), Units::Fahrenheit);
        assert_eq!(Units::parse_lenient(" Kelvin "), Units::Kelvin);
        assert_eq!(Units::parse_lenient("CELSIUS"), Units::Celsius);
        assert_eq!(Units::parse_lenient("rankine"), Units::Celsius);
        assert_eq!(Units::parse_lenient(""), Units::Celsius);
    }

    #[test]
    fn units_map_to_api_unit_systems() {
        assert_eq!(Units::Celsius.api_units(), ApiUnits::Metric);
        assert_eq!(Units::Fahrenheit.api_units(), ApiUnits::Imperial);
        assert_eq!(Units::Kelvin.api_units(), ApiUnits::Standard);
    }

    #[test]
    fn city_query_includes_country_code_when_present() {
        let bare = Location::City {
            city: "London".into(),
            country_code: None,
        };
        let qualified = Location::City {
            city: "London".into(),
            country_code: Some("GB".into()),
        };

        assert_eq!(bare.query_pairs(), vec![("q", "London".to_string())]);
        assert_eq!(qualified.query_pairs(), vec![("q", "London,GB".to_string())]);
    }

    #[test]
    fn weather_query_appends_unit_system() {
        let query = WeatherQuery::new(
            Location::Coordinates {
                latitude: 40.7128,
                longitude: -74.006,
            },
            ApiUnits::Imperial,
        );

        assert_eq!(
            query.query_pairs(),
            vec![
                ("lat", "40.7128".to_string()),
                ("lon", "-74.006".to_string()),
                ("units", "imperial".to_string()),
            ]
        );
    }

    #[test]
    fn upstream_body_tolerates_missing_wind_and_country() {
        let body = r#"{
            "name": "",
            "main": {"temp": 1.0, "feels_like": -2.0, "humidity": 80, "pressure": 1000},
            "weather": [{"description": "light snow"}],
            "sys": {"sunrise": 0, "sunset": 0}
        }"#;

        let parsed: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.wind.speed, 0.0);
        assert_eq!(parsed.wind.deg, Number::from(0));
        assert_eq!(parsed.sys.country, "");
    }
}
