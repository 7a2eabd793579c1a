use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::AssetId;

/// One currently-owned item, as reported by the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingItem {
    pub asset_id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Snapshot of an account's current inventory. Read-only to the engine.
///
/// Order is preserved as reported by the marketplace; lookups go through
/// [`HoldingsSnapshot::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldingsSnapshot(pub Vec<HoldingItem>);

impl HoldingsSnapshot {
    pub fn new(items: Vec<HoldingItem>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build an asset-id index for matching. First occurrence wins if the
    /// feed ever repeats an id.
    pub fn index(&self) -> HashMap<&AssetId, &HoldingItem> {
        let mut index = HashMap::with_capacity(self.0.len());
        for item in &self.0 {
            index.entry(&item.asset_id).or_insert(item);
        }
        index
    }
}
