//! Batch staleness checks against an asset index

use crate::index::AssetIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A client's cached copy of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetVersion {
    pub id: String,
    pub version: String,
}

impl AssetVersion {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// Ids whose cached version differs from the index, in request order.
///
/// Ids the index does not track are not stale.
pub fn stale_assets<'a>(
    index: &AssetIndex,
    cached: impl IntoIterator<Item = &'a AssetVersion>,
) -> Vec<String> {
    cached
        .into_iter()
        .filter(|asset| {
            index
                .get(&asset.id)
                .is_some_and(|entry| entry.content_version != asset.version)
        })
        .map(|asset| asset.id.clone())
        .collect()
}

/// Like [`stale_assets`] over raw JSON items; malformed items are skipped.
pub fn stale_assets_from_json(index: &AssetIndex, items: &[Value]) -> Vec<String> {
    let cached: Vec<AssetVersion> = items
        .iter()
        .filter_map(|item| match AssetVersion::deserialize(item) {
            Ok(asset) => Some(asset),
            Err(e) => {
                debug!("Skipping malformed asset item {}: {}", item, e);
                None
            }
        })
        .collect();
    stale_assets(index, &cached)
}
