use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use roomwatch_engine::asset::{is_sentinel, AssetResolver, ASSET_SENTINEL};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Mappings from the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    ids: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            ids: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl AssetResolver for StaticResolver {
    async fn resolve(&self, alert_type: &str) -> String {
        self.ids
            .get(alert_type)
            .cloned()
            .unwrap_or_else(|| ASSET_SENTINEL.to_string())
    }
}

/// TTL cache in front of a slower resolver. Sentinel answers are not
/// cached so a mapping added later is picked up on the next lookup.
pub struct CachedResolver<R> {
    inner: R,
    ttl: Duration,
    entries: DashMap<String, (String, Instant)>,
}

impl<R: AssetResolver> CachedResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl<R: AssetResolver> AssetResolver for CachedResolver<R> {
    async fn resolve(&self, alert_type: &str) -> String {
        if let Some(entry) = self.entries.get(alert_type) {
            let (asset_id, stored_at) = entry.value();
            if stored_at.elapsed() < self.ttl {
                return asset_id.clone();
            }
        }

        let asset_id = self.inner.resolve(alert_type).await;
        if is_sentinel(&asset_id) {
            self.entries.remove(alert_type);
        } else {
            self.entries
                .insert(alert_type.to_string(), (asset_id.clone(), Instant::now()));
        }
        asset_id
    }
}
