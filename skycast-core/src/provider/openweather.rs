use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::{ProviderResult, Query},
    provider::request_json,
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeatherMap client. Success is signalled by a `cod` field that is
/// either the number 200 or the string "200"; anything else carries a
/// vendor `message`.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the client at a different host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(&self, endpoint: &str, query: &Query) -> Result<ProviderResult, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential(ProviderId::OpenWeather));
        }

        let url = format!("{}{endpoint}", self.base_url);

        debug!(place = %query.place, endpoint, "querying openweather");

        let (status, payload) = request_json(
            &self.http,
            self.id(),
            &url,
            &[
                ("q", query.place.trim()),
                ("appid", self.api_key.as_str()),
                ("units", query.units.as_str()),
            ],
        )
        .await?;

        let cod_ok = match payload.get("cod") {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(200),
            Some(serde_json::Value::String(s)) => s == "200",
            _ => false,
        };
        if !cod_ok {
            let message = payload
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("OpenWeather API error")
                .to_string();
            return Err(ProviderError::Vendor { provider: self.id(), message });
        }
        if !status.is_success() {
            return Err(ProviderError::Transport {
                provider: self.id(),
                message: format!("unexpected status {status}"),
            });
        }

        Ok(ProviderResult { provider: self.id(), payload })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    fn supports_forecast(&self) -> bool {
        true
    }

    async fn current(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        self.request("/data/2.5/weather", query).await
    }

    async fn forecast(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        self.request("/data/2.5/forecast", query).await
    }
}
