use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AssetId;
use crate::models::AccountId;

/// Reference from a ledger entry to the item instance it concerns.
///
/// An item's asset id is invalidated when the item is disposed (sold or
/// traded away) and a new id is issued. `post_disposal_id` carries that new
/// id once it is known; it is what links a purchase record to the eventual
/// sale record of the same physical item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    pub game_id: String,
    pub context_id: String,
    pub asset_id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_disposal_id: Option<AssetId>,
}

/// One raw record of a purchase or sale event from the marketplace
/// transaction log. Produced by the fetch layer; read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLedgerEntry {
    pub purchaser_id: AccountId,
    pub asset: AssetReference,
    /// Entry-level display name, used as a fallback when the catalog has no
    /// entry for the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    pub paid_amount: Decimal,
    pub paid_fee: Decimal,
    pub currency_id: String,
    /// Unix timestamp (seconds) of completion.
    pub time_completed: i64,
    /// Amount credited to the seller. Only present on sale records; a sale
    /// missing it is treated as having received 0 (a data-quality gap in the
    /// upstream feed, surfaced rather than guessed at).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_currency_id: Option<String>,
}

impl RawLedgerEntry {
    /// Total acquisition cost: amount plus marketplace fee.
    pub fn paid_total(&self) -> Decimal {
        self.paid_amount + self.paid_fee
    }
}

/// Display metadata for one catalog asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub asset_id: AssetId,
    /// Pre-disposal id this catalog entry cross-references. Sale entries are
    /// keyed by the post-disposal id but remember the id the item had while
    /// it was still held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Catalog of display metadata, keyed game id -> context id -> asset id.
///
/// BTreeMaps keep iteration deterministic, which matters for the fallback
/// search by original id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCatalog(pub BTreeMap<String, BTreeMap<String, BTreeMap<AssetId, AssetMetadata>>>);

impl AssetCatalog {
    /// Direct lookup by (game id, context id, asset id).
    pub fn get(&self, game_id: &str, context_id: &str, asset_id: &AssetId) -> Option<&AssetMetadata> {
        self.0.get(game_id)?.get(context_id)?.get(asset_id)
    }

    /// Search a (game id, context id) bucket for the entry whose recorded
    /// pre-disposal id equals `asset_id`. This resolves sale records, whose
    /// catalog entry is keyed by the post-disposal id.
    pub fn find_by_original_id(
        &self,
        game_id: &str,
        context_id: &str,
        asset_id: &AssetId,
    ) -> Option<&AssetMetadata> {
        self.0
            .get(game_id)?
            .get(context_id)?
            .values()
            .find(|meta| meta.original_id.as_ref() == Some(asset_id))
    }

    /// Merge another catalog into this one (later pages win on key clash).
    pub fn merge(&mut self, other: AssetCatalog) {
        for (game_id, contexts) in other.0 {
            let game = self.0.entry(game_id).or_default();
            for (context_id, assets) in contexts {
                game.entry(context_id).or_default().extend(assets);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A complete ledger snapshot for one account, as assembled by the fetch
/// layer (possibly across several pages).
///
/// `purchases` maps the marketplace's stable record id to the raw entry. The
/// field is optional because the wire response omits it entirely for some
/// failure modes; the parser rejects such snapshots rather than treating
/// them as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchases: Option<BTreeMap<String, RawLedgerEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetCatalog>,
    /// Total record count reported by the marketplace, used by the fetch
    /// layer to drive pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl LedgerSnapshot {
    /// Fold a later page into this snapshot.
    pub fn merge_page(&mut self, page: LedgerSnapshot) {
        if let Some(purchases) = page.purchases {
            self.purchases.get_or_insert_with(BTreeMap::new).extend(purchases);
        }
        if let Some(assets) = page.assets {
            match &mut self.assets {
                Some(existing) => existing.merge(assets),
                None => self.assets = Some(assets),
            }
        }
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(asset_id: &str, original_id: Option<&str>, name: &str) -> AssetMetadata {
        AssetMetadata {
            asset_id: AssetId::from(asset_id),
            original_id: original_id.map(AssetId::from),
            market_name: Some(name.to_string()),
            icon_url: None,
        }
    }

    fn catalog_with(entries: Vec<AssetMetadata>) -> AssetCatalog {
        let mut catalog = AssetCatalog::default();
        let bucket = catalog
            .0
            .entry("730".to_string())
            .or_default()
            .entry("2".to_string())
            .or_default();
        for entry in entries {
            bucket.insert(entry.asset_id.clone(), entry);
        }
        catalog
    }

    #[test]
    fn catalog_direct_lookup() {
        let catalog = catalog_with(vec![meta("100", None, "AK-47 | Redline")]);
        let found = catalog.get("730", "2", &AssetId::from("100")).unwrap();
        assert_eq!(found.market_name.as_deref(), Some("AK-47 | Redline"));
        assert!(catalog.get("730", "2", &AssetId::from("200")).is_none());
        assert!(catalog.get("440", "2", &AssetId::from("100")).is_none());
    }

    #[test]
    fn catalog_falls_back_to_original_id() {
        // Sale entries are keyed by the post-disposal id but remember the
        // pre-disposal id the ledger entry still refers to.
        let catalog = catalog_with(vec![meta("200", Some("100"), "M4A4 | Asiimov")]);
        let found = catalog
            .find_by_original_id("730", "2", &AssetId::from("100"))
            .unwrap();
        assert_eq!(found.market_name.as_deref(), Some("M4A4 | Asiimov"));
    }

    #[test]
    fn merge_page_extends_purchases_and_assets() {
        let entry = RawLedgerEntry {
            purchaser_id: AccountId::from("1"),
            asset: AssetReference {
                game_id: "730".to_string(),
                context_id: "2".to_string(),
                asset_id: AssetId::from("100"),
                post_disposal_id: None,
            },
            market_name: None,
            paid_amount: Decimal::from(10),
            paid_fee: Decimal::ONE,
            currency_id: "1".to_string(),
            time_completed: 1_700_000_000,
            received_amount: None,
            received_currency_id: None,
        };

        let mut first = LedgerSnapshot {
            purchases: Some(BTreeMap::from([("rec-1".to_string(), entry.clone())])),
            assets: Some(catalog_with(vec![meta("100", None, "A")])),
            total_count: Some(2),
        };
        let second = LedgerSnapshot {
            purchases: Some(BTreeMap::from([("rec-2".to_string(), entry)])),
            assets: Some(catalog_with(vec![meta("200", None, "B")])),
            total_count: Some(2),
        };

        first.merge_page(second);
        assert_eq!(first.purchases.as_ref().unwrap().len(), 2);
        let catalog = first.assets.as_ref().unwrap();
        assert!(catalog.get("730", "2", &AssetId::from("100")).is_some());
        assert!(catalog.get("730", "2", &AssetId::from("200")).is_some());
    }

    #[test]
    fn paid_total_sums_amount_and_fee() {
        let entry = RawLedgerEntry {
            purchaser_id: AccountId::from("1"),
            asset: AssetReference {
                game_id: "730".to_string(),
                context_id: "2".to_string(),
                asset_id: AssetId::from("100"),
                post_disposal_id: None,
            },
            market_name: None,
            paid_amount: Decimal::new(1050, 2),
            paid_fee: Decimal::new(150, 2),
            currency_id: "1".to_string(),
            time_completed: 0,
            received_amount: None,
            received_currency_id: None,
        };
        assert_eq!(entry.paid_total(), Decimal::from(12));
    }
}
