use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::{ProviderResult, Query},
    provider::request_json,
};

use super::{CoordinateProvider, ProviderId};

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Open-Meteo client, the keyless fallback. It only understands
/// coordinates, so it is reached through the geocoder rather than the
/// primary attempt list. Errors come back as `{"error": true, "reason": …}`.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the client at a different host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoordinateProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn fetch_at(
        &self,
        latitude: f64,
        longitude: f64,
        _query: &Query,
    ) -> Result<ProviderResult, ProviderError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        debug!(%lat, %lon, "querying open-meteo");

        let (status, payload) = request_json(
            &self.http,
            self.id(),
            &url,
            &[("latitude", lat.as_str()), ("longitude", lon.as_str()), ("current_weather", "true")],
        )
        .await?;

        if payload.get("error").is_some_and(|e| e.as_bool() == Some(true)) {
            let message = payload
                .get("reason")
                .and_then(|r| r.as_str())
                .unwrap_or("Open-Meteo error")
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
