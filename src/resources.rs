use serde_json::{json, Value};

use crate::constants::{OPENWEATHER_API_URL, OPENWEATHER_API_VERSION};

pub const CONFIG_URI: &str = "config://weather-api";
pub const SUPPORTED_CITIES_URI: &str = "data://supported-cities";

/// Static document served under a fixed URI.
#[derive(Debug, Clone, Copy)]
pub struct StaticResource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub document: fn() -> Value,
}

pub const RESOURCES: &[StaticResource] = &[
    StaticResource {
        uri: CONFIG_URI,
        name: "weather-api-config",
        description: "Weather API configuration and setup information",
        document: weather_api_config,
    },
    StaticResource {
        uri: SUPPORTED_CITIES_URI,
        name: "supported-cities",
        description: "Popular cities and usage examples for testing the weather tools",
        document: supported_cities,
    },
];

pub fn find(uri: &str) -> Option<&'static StaticResource> {
    RESOURCES.iter().find(|resource| resource.uri == uri)
}

pub fn weather_api_config() -> Value {
    json!({
        "api_provider": "OpenWeatherMap",
        "api_version": OPENWEATHER_API_VERSION,
        "base_url": OPENWEATHER_API_URL,
        "documentation": "https://openweathermap.org/api",
        "features": {
            "current_weather": "Get current weather by city name or coordinates",
            "temperature_units": "Support for Celsius, Fahrenheit, and Kelvin",
            "weather_summary": "Concise summaries with motivational messages",
            "api_status": "Check API connectivity and troubleshoot issues"
        },
        "configuration": {
            "required_env_vars": ["OPENWEATHER_API_KEY"],
            "optional_env_vars": {
                "DEFAULT_UNITS": "celsius|fahrenheit|kelvin (default: celsius)",
                "WEATHER_API_TIMEOUT": "timeout in seconds (default: 10)",
                "OPENWEATHER_API_URL": "endpoint override (default: the public OpenWeatherMap endpoint)"
            }
        },
        "setup_instructions": [
            "1. Sign up at https://openweathermap.org/api",
            "2. Get your free API key from the dashboard",
            "3. Set OPENWEATHER_API_KEY environment variable",
            "4. API key activation may take up to 10 minutes",
            "5. Test with check_api_status tool"
        ],
        "rate_limits": {
            "free_tier": "60 calls/minute, 1,000,000 calls/month",
            "paid_tiers": "Higher limits available"
        },
        "supported_cities": "All major cities worldwide with ISO country codes"
    })
}

pub fn supported_cities() -> Value {
    json!({
        "popular_cities": [
            "London,GB",
            "New York,US",
            "Tokyo,JP",
            "Paris,FR",
            "Sydney,AU",
            "Berlin,DE",
            "Toronto,CA",
            "Mumbai,IN",
            "São Paulo,BR",
            "Moscow,RU",
            "Beijing,CN",
            "Cairo,EG",
            "Lagos,NG",
            "Mexico City,MX",
            "Buenos Aires,AR"
        ],
        "usage_examples": {
            "by_city": {
                "description": "Get weather by city name",
                "examples": [
                    "get_current_weather('London')",
                    "get_current_weather('New York', 'US')",
                    "get_current_weather('Tokyo', 'JP', 'fahrenheit')"
                ]
            },
            "by_coordinates": {
                "description": "Get weather by latitude and longitude",
                "examples": [
                    "get_weather_by_coordinates(51.5074, -0.1278)",
                    "get_weather_by_coordinates(40.7128, -74.0060, 'fahrenheit')",
                    "get_weather_by_coordinates(35.6762, 139.6503, 'kelvin')"
                ]
            },
            "summary": {
                "description": "Get motivational weather summary",
                "examples": [
                    "get_weather_summary('Paris')",
                    "get_weather_summary('Sydney')"
                ]
            }
        },
        "country_codes": {
            "note": "Use ISO 3166-1 alpha-2 country codes",
            "examples": {
                "GB": "United Kingdom",
                "US": "United States",
                "JP": "Japan",
                "FR": "France",
                "DE": "Germany",
                "CA": "Canada",
                "AU": "Australia"
            }
        },
        "tips": [
            "Include country code for better accuracy",
            "Use English city names",
            "Check spelling if city not found",
            "Some cities may have multiple matches - use country code to specify"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_documents_by_uri() {
        assert_eq!(find(CONFIG_URI).map(|r| r.name), Some("weather-api-config"));
        assert_eq!(find(SUPPORTED_CITIES_URI).map(|r| r.name), Some("supported-cities"));
        assert!(find("data://unknown").is_none());
    }

    #[test]
    fn config_document_names_provider_and_key_variable() {
        let doc = weather_api_config();
        assert_eq!(doc["api_provider"], "OpenWeatherMap");
        assert_eq!(doc["api_version"], "2.5");
        assert_eq!(doc["configuration"]["required_env_vars"][0], "OPENWEATHER_API_KEY");
        assert_eq!(doc["features"].as_object().map(|f| f.len()), Some(4));
    }

    #[test]
    fn supported_cities_lists_fifteen_entries() {
        let doc = supported_cities();
        let cities = doc["popular_cities"].as_array().unwrap();
        assert_eq!(cities.len(), 15);
        assert_eq!(cities[0], "London,GB");
    }
}
