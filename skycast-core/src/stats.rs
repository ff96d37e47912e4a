use std::collections::HashMap;

use crate::provider::ProviderId;

/// Per-provider success counters for the lifetime of one engine.
///
/// Counters only ever grow and are never persisted; a restart resets the
/// adaptive ordering to the static preference order.
#[derive(Debug, Default)]
pub struct ProviderStats {
    counts: HashMap<ProviderId, u64>,
}

impl ProviderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, provider: ProviderId) {
        *self.counts.entry(provider).or_insert(0) += 1;
    }

    pub fn count(&self, provider: ProviderId) -> u64 {
        self.counts.get(&provider).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<ProviderId, u64> {
        self.counts.clone()
    }
}
