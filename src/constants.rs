/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("openweather-mcp-server/", env!("CARGO_PKG_VERSION"));

/// OpenWeatherMap current weather endpoint
pub const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap API version served by [`OPENWEATHER_API_URL`]
pub const OPENWEATHER_API_VERSION: &str = "2.5";

/// Location queried by the status check
pub const STATUS_CHECK_CITY: &str = "London";
pub const STATUS_CHECK_COUNTRY_CODE: &str = "GB";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_DEFAULT_UNITS: &str = "DEFAULT_UNITS";
pub const ENV_TIMEOUT: &str = "WEATHER_API_TIMEOUT";
pub const ENV_API_URL: &str = "OPENWEATHER_API_URL";
