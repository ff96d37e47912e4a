use serde::{Deserialize, Serialize};

use crate::provider::ProviderId;

/// Unit system requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature symbol used when rendering this unit system.
    pub fn temp_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single weather lookup. Immutable once built; its only derived
/// property is the cache key.
#[derive(Debug, Clone)]
pub struct Query {
    pub place: String,
    pub units: Units,
    pub forecast: bool,
}

impl Query {
    pub fn new(place: impl Into<String>, units: Units, forecast: bool) -> Self {
        Self { place: place.into(), units, forecast }
    }

    /// Fingerprint identifying this query in the result cache. Casing and
    /// surrounding whitespace of the place name do not produce distinct keys.
    pub fn cache_key(&self) -> String {
        format!("{}|{}|{}", self.place.trim().to_lowercase(), self.units, self.forecast)
    }
}

/// A provider-tagged payload as the vendor returned it. The payload is not
/// reshaped into a common schema; renderers extract fields per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub provider: ProviderId,
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_ignores_case_and_padding() {
        let a = Query::new("London", Units::Metric, false);
        let b = Query::new("LONDON", Units::Metric, false);
        let c = Query::new(" london ", Units::Metric, false);

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn cache_key_distinguishes_units_and_forecast() {
        let base = Query::new("Kyiv", Units::Metric, false);
        let imperial = Query::new("Kyiv", Units::Imperial, false);
        let forecast = Query::new("Kyiv", Units::Metric, true);

        assert_ne!(base.cache_key(), imperial.cache_key());
        assert_ne!(base.cache_key(), forecast.cache_key());
        assert_ne!(imperial.cache_key(), forecast.cache_key());
    }

    #[test]
    fn provider_result_round_trips_through_json() {
        let result = ProviderResult {
            provider: ProviderId::WeatherApi,
            payload: serde_json::json!({"current": {"temp_c": 21.5}}),
        };

        let text = serde_json::to_string(&result).expect("serialize");
        let back: ProviderResult = serde_json::from_str(&text).expect("deserialize");

        assert_eq!(result, back);
    }
}
