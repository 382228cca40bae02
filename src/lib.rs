//! MCP server exposing OpenWeatherMap current weather lookups as tools and resources.

pub mod config;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod models;
pub mod resources;
pub mod service;
pub mod upstream;

pub use config::WeatherConfig;
pub use error::WeatherError;
pub use service::Weather;
