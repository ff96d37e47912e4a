use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    error::ProviderError,
    model::{ProviderResult, Query, Units},
    provider::request_json,
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://weather.visualcrossing.com";

/// Visual Crossing timeline client. The place name is part of the URL path,
/// not a query parameter, and failures carry an `errorCode` field. There is
/// no separate forecast endpoint; forecast queries get the same
/// current-conditions payload.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the client at a different host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::VisualCrossing
    }

    fn supports_forecast(&self) -> bool {
        false
    }

    async fn current(&self, query: &Query) -> Result<ProviderResult, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential(self.id()));
        }

        let unit_group = match query.units {
            Units::Metric => "metric",
            Units::Imperial => "us",
        };
        // The place rides in the URL path and must be percent-encoded as a
        // whole segment, not just its spaces.
        let mut url = Url::parse(&self.base_url).map_err(|err| ProviderError::Transport {
            provider: ProviderId::VisualCrossing,
            message: format!("invalid base URL: {err}"),
        })?;
        url.path_segments_mut()
            .map_err(|()| ProviderError::Transport {
                provider: ProviderId::VisualCrossing,
                message: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend([
                "VisualCrossingWebServices",
                "rest",
                "services",
                "timeline",
                query.place.trim(),
            ]);

        debug!(place = %query.place, unit_group, "querying visualcrossing");

        let (status, payload) = request_json(
            &self.http,
            self.id(),
            url.as_str(),
            &[("unitGroup", unit_group), ("key", self.api_key.as_str()), ("include", "current")],
        )
        .await?;

        if payload.get("errorCode").is_some() {
            let message = payload
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Visual Crossing error")
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
