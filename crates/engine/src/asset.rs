use async_trait::async_trait;
use std::collections::HashMap;

/// Placeholder asset id used when no mapping exists. Not an error.
pub const ASSET_SENTINEL: &str = "no-asset-id-assigned";

/// Maps an alert type to the asset it concerns. Implementations swallow
/// their own failures and answer with [`ASSET_SENTINEL`].
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(&self, alert_type: &str) -> String;
}

/// Resolved mappings known to the engine at emission time.
#[derive(Debug, Clone, Default)]
pub struct AssetMap {
    ids: HashMap<String, String>,
}

impl AssetMap {
    pub fn insert(&mut self, alert_type: &str, asset_id: &str) {
        self.ids.insert(alert_type.to_string(), asset_id.to_string());
    }

    pub fn get(&self, alert_type: &str) -> Option<&str> {
        self.ids.get(alert_type).map(String::as_str)
    }

    pub fn get_or_sentinel(&self, alert_type: &str) -> String {
        self.get(alert_type).unwrap_or(ASSET_SENTINEL).to_string()
    }
}

pub fn is_sentinel(asset_id: &str) -> bool {
    asset_id == ASSET_SENTINEL
}
