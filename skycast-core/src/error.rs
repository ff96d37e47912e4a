use thiserror::Error;

use crate::provider::ProviderId;

/// Failure of a single provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No credential configured; raised before any network I/O happens.
    #[error("missing API key for {0}")]
    MissingCredential(ProviderId),

    /// The vendor answered but reported an error of its own
    /// (error code field, `error` key, non-200 `cod`, and so on).
    #[error("{provider} rejected the request: {message}")]
    Vendor { provider: ProviderId, message: String },

    /// Timeout, connection failure or an unreadable response body.
    #[error("{provider} request failed: {message}")]
    Transport { provider: ProviderId, message: String },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderId {
        match self {
            ProviderError::MissingCredential(id) => *id,
            ProviderError::Vendor { provider, .. } | ProviderError::Transport { provider, .. } => {
                *provider
            }
        }
    }
}

/// Failure to resolve a place name to coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no geocoding-capable provider is configured")]
    NoProviderConfigured,

    #[error("no provider could resolve '{place}' to coordinates")]
    NotFound { place: String },
}

/// One failed provider attempt within a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub provider: ProviderId,
    pub message: String,
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}

/// Every attempt failed. Carries each underlying cause in attempt order so
/// the caller can present one coherent diagnostic.
#[derive(Debug)]
pub struct AggregateError {
    pub attempts: Vec<AttemptError>,
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "all weather providers failed:")?;
        for attempt in &self.attempts {
            write!(f, "\n  {attempt}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_error_lists_every_cause_in_order() {
        let err = AggregateError {
            attempts: vec![
                AttemptError {
                    provider: ProviderId::OpenWeather,
                    message: "missing API key for openweather".into(),
                },
                AttemptError {
                    provider: ProviderId::WeatherApi,
                    message: "request failed: timed out".into(),
                },
            ],
        };

        let text = err.to_string();
        assert!(text.starts_with("all weather providers failed:"));

        let ow = text.find("openweather").expect("first cause listed");
        let wa = text.find("weatherapi").expect("second cause listed");
        assert!(ow < wa);
    }

    #[test]
    fn provider_error_exposes_its_provider() {
        let err = ProviderError::Transport {
            provider: ProviderId::VisualCrossing,
            message: "connection refused".into(),
        };
        assert_eq!(err.provider(), ProviderId::VisualCrossing);

        let err = ProviderError::MissingCredential(ProviderId::OpenWeather);
        assert_eq!(err.provider(), ProviderId::OpenWeather);
    }
}
