use std::{convert::TryFrom, fmt::Debug};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Config, ProviderResult, Query,
    error::ProviderError,
    provider::{
        openweather::OpenWeatherProvider, visualcrossing::VisualCrossingProvider,
        weatherapi::WeatherApiProvider,
    },
};

pub mod openmeteo;
pub mod openweather;
pub mod visualcrossing;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "openweather")]
    OpenWeather,
    #[serde(rename = "weatherapi")]
    WeatherApi,
    #[serde(rename = "visualcrossing")]
    VisualCrossing,
    #[serde(rename = "open-meteo")]
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::VisualCrossing => "visualcrossing",
            ProviderId::OpenMeteo => "open-meteo",
        }
    }

    /// Keyed providers in the static preference order. Ties in the adaptive
    /// ordering fall back to this order; open-meteo is keyless and reached
    /// only through the geocoding fallback.
    pub const fn keyed() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi, ProviderId::VisualCrossing]
    }

    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenWeather,
            ProviderId::WeatherApi,
            ProviderId::VisualCrossing,
            ProviderId::OpenMeteo,
        ]
    }

    /// Environment variable holding the credential, for keyed providers.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            ProviderId::OpenWeather => Some("OPENWEATHER_API_KEY"),
            ProviderId::WeatherApi => Some("WEATHERAPI_API_KEY"),
            ProviderId::VisualCrossing => Some("VISUALCROSSING_API_KEY"),
            ProviderId::OpenMeteo => None,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            "open-meteo" | "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi, \
                 visualcrossing, open-meteo."
            )),
        }
    }
}

/// One external weather vendor reachable by place name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Whether the vendor has a dedicated forecast endpoint.
    fn supports_forecast(&self) -> bool;

    /// Current conditions for the queried place.
    async fn current(&self, query: &Query) -> Result<ProviderResult, ProviderError>;

    /// Short-range forecast; only reached when `supports_forecast` is true.
    async fn forecast(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        self.current(query).await
    }

    /// Entry point used by the engine. Forecast is best-effort: a provider
    /// whose capability flag is false answers a forecast query with its
    /// current-conditions payload.
    async fn fetch(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        if query.forecast && self.supports_forecast() {
            self.forecast(query).await
        } else {
            self.current(query).await
        }
    }
}

/// The keyless vendor; takes resolved coordinates instead of a place name.
#[async_trait]
pub trait CoordinateProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch_at(
        &self,
        latitude: f64,
        longitude: f64,
        query: &Query,
    ) -> Result<ProviderResult, ProviderError>;
}

/// Build every keyed provider that has a credential configured, in the
/// static preference order. A provider without a credential is disabled,
/// never an error.
pub fn configured_providers(config: &Config) -> Vec<Box<dyn WeatherProvider>> {
    ProviderId::keyed()
        .iter()
        .filter_map(|id| {
            let api_key = config.provider_api_key(*id)?;
            let boxed: Box<dyn WeatherProvider> = match id {
                ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key)),
                ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key)),
                ProviderId::VisualCrossing => Box::new(VisualCrossingProvider::new(api_key)),
                ProviderId::OpenMeteo => return None,
            };
            Some(boxed)
        })
        .collect()
}

/// Network-layer timeout for a single weather call.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Issue a GET and parse the body as JSON. Transport failures and
/// unparseable bodies map to `ProviderError::Transport`; vendor-level
/// success/error discrimination stays with each client.
pub(crate) async fn request_json(
    http: &reqwest::Client,
    provider: ProviderId,
    url: &str,
    params: &[(&str, &str)],
) -> Result<(reqwest::StatusCode, serde_json::Value), ProviderError> {
    let res = http
        .get(url)
        .query(params)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|err| ProviderError::Transport {
            provider,
            message: format!("request failed: {err}"),
        })?;

    let status = res.status();
    let body = res.text().await.map_err(|err| ProviderError::Transport {
        provider,
        message: format!("failed to read response body: {err}"),
    })?;

    let payload: serde_json::Value =
        serde_json::from_str(&body).map_err(|_| ProviderError::Transport {
            provider,
            message: if status.is_success() {
                format!("unparseable response body: {}", truncate_body(&body))
            } else {
                format!("status {status}: {}", truncate_body(&body))
            },
        })?;

    Ok((status, payload))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
