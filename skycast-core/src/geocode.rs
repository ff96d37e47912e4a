//! Place-name to coordinate resolution, used only by the keyless
//! fallback path. Keyed providers' own geocoding endpoints are tried in a
//! fixed preference order; the first non-empty answer wins.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Config, error::GeocodeError, provider::ProviderId};

/// Geocoding calls are cheaper than weather calls and get a shorter timeout.
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
const WEATHERAPI_BASE_URL: &str = "https://api.weatherapi.com";

#[async_trait]
pub trait Geocode: Send + Sync + Debug {
    async fn resolve(&self, place: &str) -> Result<(f64, f64), GeocodeError>;
}

/// Resolves coordinates through whichever keyed provider is configured:
/// OpenWeather's direct geocoding API first, then WeatherAPI's search
/// endpoint.
#[derive(Debug)]
pub struct ProviderGeocoder {
    openweather_key: Option<String>,
    weatherapi_key: Option<String>,
    openweather_base: String,
    weatherapi_base: String,
    http: Client,
}

impl ProviderGeocoder {
    pub fn from_config(config: &Config) -> Self {
        Self {
            openweather_key: config.provider_api_key(ProviderId::OpenWeather).map(str::to_owned),
            weatherapi_key: config.provider_api_key(ProviderId::WeatherApi).map(str::to_owned),
            openweather_base: OPENWEATHER_BASE_URL.to_string(),
            weatherapi_base: WEATHERAPI_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point both geocoding endpoints at different hosts, for tests.
    pub fn with_base_urls(
        mut self,
        openweather_base: impl Into<String>,
        weatherapi_base: impl Into<String>,
    ) -> Self {
        self.openweather_base = openweather_base.into();
        self.weatherapi_base = weatherapi_base.into();
        self
    }

    async fn via_openweather(&self, key: &str, place: &str) -> Option<(f64, f64)> {
        #[derive(Debug, Deserialize)]
        struct Hit {
            lat: f64,
            lon: f64,
        }

        let url = format!("{}/geo/1.0/direct", self.openweather_base);
        let res = self
            .http
            .get(&url)
            .query(&[("q", place), ("limit", "1"), ("appid", key)])
            .timeout(GEOCODE_TIMEOUT)
            .send()
            .await
            .ok()?;

        if !res.status().is_success() {
            debug!(status = %res.status(), "openweather geocoding returned an error status");
            return None;
        }

        let hits: Vec<Hit> = res.json().await.ok()?;
        hits.first().map(|hit| (hit.lat, hit.lon))
    }

    async fn via_weatherapi(&self, key: &str, place: &str) -> Option<(f64, f64)> {
        #[derive(Debug, Deserialize)]
        struct Hit {
            lat: f64,
            lon: f64,
        }

        let url = format!("{}/v1/search.json", self.weatherapi_base);
        let res = self
            .http
            .get(&url)
            .query(&[("key", key), ("q", place)])
            .timeout(GEOCODE_TIMEOUT)
            .send()
            .await
            .ok()?;

        if !res.status().is_success() {
            debug!(status = %res.status(), "weatherapi geocoding returned an error status");
            return None;
        }

        let hits: Vec<Hit> = res.json().await.ok()?;
        hits.first().map(|hit| (hit.lat, hit.lon))
    }
}

#[async_trait]
impl Geocode for ProviderGeocoder {
    async fn resolve(&self, place: &str) -> Result<(f64, f64), GeocodeError> {
        if self.openweather_key.is_none() && self.weatherapi_key.is_none() {
            return Err(GeocodeError::NoProviderConfigured);
        }

        if let Some(key) = self.openweather_key.as_deref() {
            if let Some(coords) = self.via_openweather(key, place).await {
                debug!(place, lat = coords.0, lon = coords.1, "geocoded via openweather");
                return Ok(coords);
            }
        }

        if let Some(key) = self.weatherapi_key.as_deref() {
            if let Some(coords) = self.via_weatherapi(key, place).await {
                debug!(place, lat = coords.0, lon = coords.1, "geocoded via weatherapi");
                return Ok(coords);
            }
        }

        Err(GeocodeError::NotFound { place: place.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_geocoder_fails_without_network() {
        let geocoder = ProviderGeocoder::from_config(&Config::default());
        let err = geocoder.resolve("London").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NoProviderConfigured));
    }
}
