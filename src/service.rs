use anyhow::Result;
use reqwest::StatusCode;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::WeatherConfig;
use crate::constants::{OPENWEATHER_API_VERSION, STATUS_CHECK_CITY, STATUS_CHECK_COUNTRY_CODE};
use crate::error::WeatherError;
use crate::formatters::{format_reading, format_summary};
use crate::models::{
    ApiUnits, Coordinates, CurrentWeatherResponse, GetCurrentWeatherRequest,
    GetWeatherByCoordinatesRequest, GetWeatherSummaryRequest, Location, Units, WeatherQuery,
    WeatherReading, WeatherSummary,
};
use crate::resources::{self, StaticResource};
use crate::upstream::{HttpWeatherApi, WeatherApi};

/// Main weather service that handles MCP requests
#[derive(Clone)]
pub struct Weather {
    config: Arc<WeatherConfig>,
    api: Arc<dyn WeatherApi>,
    tool_router: ToolRouter<Self>,
}

impl Weather {
    /// Creates a service backed by the OpenWeatherMap HTTP API
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let api = HttpWeatherApi::new(&config)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Creates a service over an arbitrary weather source
    pub fn with_api(config: WeatherConfig, api: Arc<dyn WeatherApi>) -> Self {
        Self {
            config: Arc::new(config),
            api,
            tool_router: Self::tool_router(),
        }
    }

    /// Releases the HTTP client. Safe to call more than once.
    pub async fn shutdown(&self) {
        if !self.api.close().await {
            tracing::debug!("Weather API client already closed");
        }
    }

    fn require_api_key(&self) -> Result<(), WeatherError> {
        if self.config.has_api_key() {
            Ok(())
        } else {
            Err(WeatherError::MissingApiKey)
        }
    }

    fn resolve_units(&self, units: Option<&str>) -> Units {
        units
            .map(Units::parse_lenient)
            .unwrap_or(self.config.default_units)
    }

    /// Current weather for a city, optionally qualified by country code
    pub async fn current_weather(
        &self,
        city: &str,
        country_code: Option<&str>,
        units: Option<&str>,
    ) -> Result<WeatherReading, WeatherError> {
        let units = self.resolve_units(units);
        self.fetch_city(city, country_code, units).await
    }

    async fn fetch_city(
        &self,
        city: &str,
        country_code: Option<&str>,
        units: Units,
    ) -> Result<WeatherReading, WeatherError> {
        self.require_api_key()?;

        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }
        let country_code = country_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        let location = Location::City {
            city: city.to_string(),
            country_code,
        };
        self.lookup(location, units, None).await
    }

    /// Current weather at a latitude/longitude pair
    pub async fn weather_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        units: Option<&str>,
    ) -> Result<WeatherReading, WeatherError> {
        self.require_api_key()?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidLongitude(longitude));
        }

        let units = self.resolve_units(units);
        let location = Location::Coordinates {
            latitude,
            longitude,
        };
        let coordinates = Coordinates {
            latitude,
            longitude,
        };
        self.lookup(location, units, Some(coordinates)).await
    }

    /// Celsius reading for a city condensed into a motivational summary
    pub async fn weather_summary(&self, city: &str) -> Result<WeatherSummary, WeatherError> {
        let reading = self.fetch_city(city, None, Units::Celsius).await?;
        Ok(format_summary(&reading))
    }

    async fn lookup(
        &self,
        location: Location,
        units: Units,
        coordinates: Option<Coordinates>,
    ) -> Result<WeatherReading, WeatherError> {
        let query = WeatherQuery::new(location, units.api_units());
        let response = self.api.current(&query).await?;

        match response.status {
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound(query.location)),
            StatusCode::UNAUTHORIZED => return Err(WeatherError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(WeatherError::RateLimited),
            status if !status.is_success() => return Err(WeatherError::Upstream(status)),
            _ => {}
        }

        let parsed: CurrentWeatherResponse = serde_json::from_str(&response.body)?;
        format_reading(parsed, query.units, units, coordinates)
    }

    /// Queries the API for a fixed location and reports configuration health
    pub async fn api_status(&self) -> Value {
        let configuration = json!({
            "api_key_set": self.config.has_api_key(),
            "default_units": self.config.default_units,
            "timeout": self.config.timeout.as_secs(),
        });

        if !self.config.has_api_key() {
            return status_report(
                "not_configured",
                "API key not set",
                configuration,
                &[
                    "Set OPENWEATHER_API_KEY environment variable",
                    "Get free API key from https://openweathermap.org/api",
                    "Verify API key is active (may take up to 10 minutes after signup)",
                ],
                "error",
            );
        }

        let query = WeatherQuery::new(
            Location::City {
                city: STATUS_CHECK_CITY.to_string(),
                country_code: Some(STATUS_CHECK_COUNTRY_CODE.to_string()),
            },
            ApiUnits::Metric,
        );

        match self.api.current(&query).await {
            Ok(response) => match response.status {
                StatusCode::OK => json!({
                    "api_status": "operational",
                    "message": "API is working correctly",
                    "configuration": with_fields(configuration, json!({
                        "api_key_valid": true,
                        "provider": "OpenWeatherMap",
                        "version": OPENWEATHER_API_VERSION,
                    })),
                    "test_result": "Successfully retrieved weather for London",
                    "supported_features": [
                        "Current weather by city name",
                        "Current weather by coordinates",
                        "Temperature unit conversion",
                        "Weather summaries with motivation"
                    ],
                    "status": "success",
                }),
                StatusCode::UNAUTHORIZED => status_report(
                    "invalid_key",
                    "API key is invalid",
                    with_fields(configuration, json!({ "api_key_valid": false })),
                    &[
                        "Verify API key is correct",
                        "Check if API key is activated (may take up to 10 minutes)",
                        "Ensure you're using the correct API key from your OpenWeatherMap account",
                    ],
                    "error",
                ),
                StatusCode::TOO_MANY_REQUESTS => status_report(
                    "rate_limited",
                    "API rate limit exceeded",
                    with_fields(configuration, json!({ "api_key_valid": true })),
                    &[
                        "Wait before making more requests",
                        "Consider upgrading to a paid plan for higher limits",
                        "Free tier allows 60 calls/minute, 1,000,000 calls/month",
                    ],
                    "warning",
                ),
                status => status_report(
                    "error",
                    format!("API returned status code {}", status.as_u16()),
                    configuration,
                    &[
                        "Check OpenWeatherMap service status",
                        "Verify internet connectivity",
                        "Try again in a few minutes",
                    ],
                    "error",
                ),
            },
            Err(WeatherError::Timeout) => status_report(
                "timeout",
                "API request timed out",
                configuration,
                &[
                    "Check internet connectivity",
                    "Increase timeout value",
                    "Try again later",
                ],
                "error",
            ),
            Err(err) => status_report(
                "unknown_error",
                err.to_string(),
                configuration,
                &[
                    "Check error message above",
                    "Verify the server can reach api.openweathermap.org",
                    "Restart the server if the issue persists",
                ],
                "error",
            ),
        }
    }
}

fn status_report(
    api_status: &str,
    message: impl Into<String>,
    configuration: Value,
    troubleshooting: &[&str],
    status: &str,
) -> Value {
    json!({
        "api_status": api_status,
        "message": message.into(),
        "configuration": configuration,
        "troubleshooting": troubleshooting,
        "status": status,
    })
}

fn with_fields(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize response: {}", e), None))
}

/// Turns a lookup outcome into a tool result; failures become error results, never protocol errors
fn outcome_to_result<T: Serialize>(outcome: Result<T, WeatherError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(to_pretty_json(&value)?)])),
        Err(err) => {
            if err.is_invalid_input() {
                tracing::info!("Rejected input: {}", err);
            } else {
                tracing::warn!("Weather lookup failed: {}", err);
            }
            Ok(CallToolResult::error(vec![Content::text(to_pretty_json(&err.to_payload())?)]))
        }
    }
}

fn to_mcp_resource(resource: &StaticResource) -> Resource {
    let mut raw = RawResource::new(resource.uri, resource.name);
    raw.description = Some(resource.description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

fn list_static_resources() -> ListResourcesResult {
    ListResourcesResult::with_all_items(resources::RESOURCES.iter().map(to_mcp_resource).collect())
}

fn read_static_resource(uri: String) -> Result<ReadResourceResult, McpError> {
    let resource = resources::find(&uri).ok_or_else(|| {
        McpError::resource_not_found(
            format!("Unknown resource: {}", uri),
            Some(json!({ "uri": uri })),
        )
    })?;
    let text = to_pretty_json(&(resource.document)())?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    })
}

#[tool_handler]
impl ServerHandler for Weather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "openweather-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather information service powered by the OpenWeatherMap API. \
                Provides current weather by city or coordinates, motivational summaries \
                and an API health check."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(list_static_resources())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        tracing::info!("Reading resource: {}", request.uri);

        read_static_resource(request.uri)
    }
}

#[tool_router]
impl Weather {
    /// Gets current weather for a city
    #[tool(description = "Get current weather for a city. Optionally provide an ISO 3166 country code (e.g., 'GB', 'US') and units: celsius, fahrenheit or kelvin (default: the server's DEFAULT_UNITS setting, celsius unless configured).")]
    async fn get_current_weather(
        &self,
        Parameters(request): Parameters<GetCurrentWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting current weather for city: {}", request.city);

        let outcome = self
            .current_weather(
                &request.city,
                request.country_code.as_deref(),
                request.units.as_deref(),
            )
            .await;

        outcome_to_result(outcome)
    }

    /// Gets current weather for a coordinate pair
    #[tool(description = "Get current weather by geographic coordinates. Latitude must be between -90 and 90, longitude between -180 and 180. Units: celsius, fahrenheit or kelvin (default: the server's DEFAULT_UNITS setting, celsius unless configured).")]
    async fn get_weather_by_coordinates(
        &self,
        Parameters(request): Parameters<GetWeatherByCoordinatesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting current weather for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let outcome = self
            .weather_by_coordinates(request.latitude, request.longitude, request.units.as_deref())
            .await;

        outcome_to_result(outcome)
    }

    /// Gets a concise summary with a motivational message
    #[tool(description = "Get a concise weather summary for a city with a motivational message.")]
    async fn get_weather_summary(
        &self,
        Parameters(request): Parameters<GetWeatherSummaryRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather summary for city: {}", request.city);

        outcome_to_result(self.weather_summary(&request.city).await)
    }

    /// Checks connectivity and configuration of the OpenWeatherMap API
    #[tool(description = "Check OpenWeatherMap API connectivity and configuration. Returns the API status and troubleshooting hints.")]
    async fn check_api_status(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Checking API status");

        let report = self.api_status().await;
        Ok(CallToolResult::success(vec![Content::text(to_pretty_json(&report)?)]))
    }
}
