//! The provider aggregation engine.
//!
//! A fetch runs one pass through: cache lookup, keyed providers in adaptive
//! order, then the geocoded keyless fallback. The first success is cached
//! and counted; anything less than total failure stays invisible to the
//! caller.

use std::cmp::Reverse;

use tracing::{debug, warn};

use crate::{
    Config,
    cache::ResultCache,
    error::{AggregateError, AttemptError},
    geocode::{Geocode, ProviderGeocoder},
    model::{ProviderResult, Query, Units},
    provider::{
        CoordinateProvider, ProviderId, WeatherProvider, configured_providers,
        openmeteo::OpenMeteoProvider,
    },
    stats::ProviderStats,
};

/// Sink for attempt-failure events, called once per failed attempt.
/// Timestamping is the sink's job, not the engine's.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &str);
}

/// Consumer of a finished result; implemented by the presentation layer.
/// The payload stays provider-shaped, so all field extraction and unit
/// symbol selection happens behind this trait.
pub trait Renderer {
    fn render(&self, result: &ProviderResult, units: Units, forecast: bool);
}

/// An `EventSink` that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &str) {}
}

pub struct AggregationEngine {
    providers: Vec<Box<dyn WeatherProvider>>,
    geocoder: Box<dyn Geocode>,
    keyless: Box<dyn CoordinateProvider>,
    cache: ResultCache,
    stats: ProviderStats,
    events: Box<dyn EventSink>,
}

impl AggregationEngine {
    pub fn new(
        providers: Vec<Box<dyn WeatherProvider>>,
        geocoder: Box<dyn Geocode>,
        keyless: Box<dyn CoordinateProvider>,
        cache: ResultCache,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self { providers, geocoder, keyless, cache, stats: ProviderStats::new(), events }
    }

    /// Wire up the real providers from configuration. Providers without a
    /// credential are left out of the attempt list entirely.
    pub fn from_config(config: &Config, cache: ResultCache, events: Box<dyn EventSink>) -> Self {
        Self::new(
            configured_providers(config),
            Box::new(ProviderGeocoder::from_config(config)),
            Box::new(OpenMeteoProvider::new()),
            cache,
            events,
        )
    }

    pub fn stats(&self) -> &ProviderStats {
        &self.stats
    }

    /// Fetch weather for `query`, falling through providers until one
    /// answers. Returns a cached result when the query has been seen
    /// before; fails only when every attempt, keyed and keyless, failed.
    pub async fn fetch(&mut self, query: &Query) -> Result<ProviderResult, AggregateError> {
        let key = query.cache_key();

        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, provider = %hit.provider, "cache hit");
            return Ok(hit.clone());
        }

        let mut attempts: Vec<AttemptError> = Vec::new();

        for idx in self.attempt_order() {
            let provider = &self.providers[idx];
            let id = provider.id();
            let outcome = provider.fetch(query).await;
            match outcome {
                Ok(result) => return Ok(self.commit(key, result)),
                Err(err) => self.note_failure(&mut attempts, id, err.to_string()),
            }
        }

        let fallback = self.keyless_fallback(query).await;
        match fallback {
            Ok(result) => Ok(self.commit(key, result)),
            Err(message) => {
                self.note_failure(&mut attempts, self.keyless.id(), message);
                Err(AggregateError { attempts })
            }
        }
    }

    // Descending success count; the sort is stable, so ties keep the static
    // preference order the providers were registered in.
    fn attempt_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.providers.len()).collect();
        order.sort_by_key(|&idx| Reverse(self.stats.count(self.providers[idx].id())));
        order
    }

    // Success path side effects: exactly one stats increment and one
    // whole-entry cache write per winning fetch.
    fn commit(&mut self, key: String, result: ProviderResult) -> ProviderResult {
        debug!(provider = %result.provider, "provider answered");
        self.stats.record_success(result.provider);
        self.cache.put(key, result.clone());
        result
    }

    fn note_failure(&self, attempts: &mut Vec<AttemptError>, provider: ProviderId, message: String) {
        warn!(%provider, %message, "provider attempt failed");
        self.events.record(&format!("{provider} failed: {message}"));
        attempts.push(AttemptError { provider, message });
    }

    async fn keyless_fallback(&self, query: &Query) -> Result<ProviderResult, String> {
        let (lat, lon) = self
            .geocoder
            .resolve(query.place.trim())
            .await
            .map_err(|err| format!("geocoding failed: {err}"))?;

        self.keyless.fetch_at(lat, lon, query).await.map_err(|err| err.to_string())
    }
}
