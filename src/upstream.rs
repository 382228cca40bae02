use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard};

use crate::config::WeatherConfig;
use crate::constants::USER_AGENT;
use crate::error::WeatherError;
use crate::models::WeatherQuery;

/// Raw answer from the current weather endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Source of current weather data.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Issues a single request. Only transport faults are errors; any HTTP status is returned.
    async fn current(&self, query: &WeatherQuery) -> Result<UpstreamResponse, WeatherError>;

    /// Releases held resources. Returns true only for the call that actually released them.
    async fn close(&self) -> bool {
        false
    }
}

/// reqwest-backed client for the OpenWeatherMap API.
#[derive(Debug)]
pub struct HttpWeatherApi {
    client: Mutex<Option<Client>>,
    api_url: String,
    api_key: String,
}

impl HttpWeatherApi {
    /// Builds the shared HTTP client with the configured timeout.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client: Mutex::new(Some(client)),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    fn slot(&self) -> MutexGuard<'_, Option<Client>> {
        self.client.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_closed(&self) -> bool {
        self.slot().is_none()
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn current(&self, query: &WeatherQuery) -> Result<UpstreamResponse, WeatherError> {
        let client = self.slot().clone().ok_or(WeatherError::ClientClosed)?;

        let mut params = query.query_pairs();
        params.push(("appid", self.api_key.clone()));

        tracing::debug!(location = %query.location, units = query.units.as_str(), "Requesting current weather");

        let response = client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        Ok(UpstreamResponse { status, body })
    }

    async fn close(&self) -> bool {
        let released = self.slot().take().is_some();
        if released {
            tracing::info!("HTTP client closed");
        }
        released
    }
}

fn classify_transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::Transport(err)
    }
}
