//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for each weather provider, plus the keyless fallback
//! - The aggregation engine: cache lookup, adaptive provider ordering,
//!   sequential fallback, and the geocoded keyless path
//! - A file-backed result cache and per-provider success counters
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod geocode;
pub mod locate;
pub mod model;
pub mod provider;
pub mod stats;

pub use cache::ResultCache;
pub use config::{Config, ProviderConfig};
pub use engine::{AggregationEngine, EventSink, NullSink, Renderer};
pub use error::{AggregateError, AttemptError, GeocodeError, ProviderError};
pub use geocode::{Geocode, ProviderGeocoder};
pub use model::{ProviderResult, Query, Units};
pub use provider::{CoordinateProvider, ProviderId, WeatherProvider, configured_providers};
pub use stats::ProviderStats;
