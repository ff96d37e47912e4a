use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::{ProviderResult, Query},
    provider::request_json,
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// Days requested from the forecast endpoint.
const FORECAST_DAYS: &str = "5";

/// WeatherAPI.com client. The vendor reports failures through a top-level
/// `error` object even on some 2xx responses; both temperature units come
/// back in every payload, so no unit parameter is sent.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the client at a different host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
        query: &Query,
    ) -> Result<ProviderResult, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential(ProviderId::WeatherApi));
        }

        let place = query.place.trim();
        let mut params: Vec<(&str, &str)> =
            vec![("key", self.api_key.as_str()), ("q", place), ("aqi", "no")];
        params.extend_from_slice(extra);

        let url = format!("{}{endpoint}", self.base_url);

        debug!(place = %query.place, endpoint, "querying weatherapi");

        let (status, payload) = request_json(&self.http, self.id(), &url, &params).await?;

        if let Some(error) = payload.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("WeatherAPI error")
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
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    fn supports_forecast(&self) -> bool {
        true
    }

    async fn current(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        self.request("/v1/current.json", &[], query).await
    }

    async fn forecast(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        self.request("/v1/forecast.json", &[("days", FORECAST_DAYS)], query).await
    }
}
