use std::{collections::HashMap, fs, io, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use tracing::{debug, warn};

use crate::model::ProviderResult;

/// File-backed table of past results, keyed by query fingerprint.
///
/// Entries never expire and are never deleted; a repeated query is served
/// from here without touching the network. A missing or corrupt backing
/// file degrades to an empty cache rather than failing the engine.
#[derive(Debug)]
pub struct ResultCache {
    path: PathBuf,
    entries: HashMap<String, ProviderResult>,
}

impl ResultCache {
    /// Load the cache stored at `path`, treating unreadable or unparseable
    /// content as empty.
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "cache file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "cache file is unreadable, starting empty");
                HashMap::new()
            }
        };

        Self { path, entries }
    }

    /// Default cache location under the platform cache directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform cache directory"))?;

        Ok(dirs.cache_dir().join("results.json"))
    }

    pub fn get(&self, key: &str) -> Option<&ProviderResult> {
        self.entries.get(key)
    }

    /// Replace the entry for `key` and persist the whole table. A failed
    /// write keeps the in-memory entry and is logged, not surfaced.
    pub fn put(&mut self, key: String, result: ProviderResult) {
        self.entries.insert(key, result);
        if let Err(err) = self.persist() {
            warn!(path = %self.path.display(), %err, "failed to persist result cache");
        } else {
            debug!(path = %self.path.display(), entries = self.entries.len(), "cache persisted");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Whole-file replacement through a temp file so a reader never observes
    // a partially written table.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize result cache")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write cache file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace cache file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    fn sample_result() -> ProviderResult {
        ProviderResult {
            provider: ProviderId::OpenWeather,
            payload: serde_json::json!({"cod": 200, "name": "London", "main": {"temp": 11.2}}),
        }
    }

    #[test]
    fn missing_file_is_an_empty_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = ResultCache::open(dir.path().join("results.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn put_then_reopen_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.json");

        let mut cache = ResultCache::open(path.clone());
        cache.put("london|metric|false".into(), sample_result());

        let reopened = ResultCache::open(path);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get("london|metric|false"), Some(&sample_result()));
    }

    #[test]
    fn corrupt_file_degrades_to_empty_and_is_repopulated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.json");
        fs::write(&path, b"{not valid json!").expect("write garbage");

        let mut cache = ResultCache::open(path.clone());
        assert!(cache.is_empty());

        cache.put("london|metric|false".into(), sample_result());

        let reopened = ResultCache::open(path);
        assert_eq!(reopened.get("london|metric|false"), Some(&sample_result()));
    }

    #[test]
    fn put_replaces_the_whole_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cache = ResultCache::open(dir.path().join("results.json"));

        cache.put("kyiv|metric|false".into(), sample_result());

        let newer = ProviderResult {
            provider: ProviderId::WeatherApi,
            payload: serde_json::json!({"current": {"temp_c": -3.0}}),
        };
        cache.put("kyiv|metric|false".into(), newer.clone());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("kyiv|metric|false"), Some(&newer));
    }
}
