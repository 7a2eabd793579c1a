#![allow(dead_code)]

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use lootledger::models::{
    AccountId, AssetCatalog, AssetId, AssetMetadata, AssetReference, HoldingItem,
    HoldingsSnapshot, LedgerSnapshot, RawLedgerEntry,
};

pub const ACCOUNT: &str = "76561198000000000";
pub const GAME: &str = "730";
pub const CONTEXT: &str = "2";

pub fn account() -> AccountId {
    AccountId::from(ACCOUNT)
}

/// A purchase by the configured account.
pub fn purchase_entry(asset_id: &str, post_disposal_id: Option<&str>, paid: i64) -> RawLedgerEntry {
    entry(ACCOUNT, asset_id, post_disposal_id, paid, None)
}

/// A sale by the configured account (purchaser is someone else).
pub fn sale_entry(asset_id: &str, received: Option<i64>) -> RawLedgerEntry {
    entry("other-buyer", asset_id, None, 0, received)
}

pub fn entry(
    purchaser: &str,
    asset_id: &str,
    post_disposal_id: Option<&str>,
    paid: i64,
    received: Option<i64>,
) -> RawLedgerEntry {
    RawLedgerEntry {
        purchaser_id: AccountId::from(purchaser),
        asset: AssetReference {
            game_id: GAME.to_string(),
            context_id: CONTEXT.to_string(),
            asset_id: AssetId::from(asset_id),
            post_disposal_id: post_disposal_id.map(AssetId::from),
        },
        market_name: None,
        paid_amount: Decimal::from(paid),
        paid_fee: Decimal::ZERO,
        currency_id: "1".to_string(),
        time_completed: 1_700_000_000,
        received_amount: received.map(Decimal::from),
        received_currency_id: received.map(|_| "1".to_string()),
    }
}

pub fn snapshot(entries: Vec<(&str, RawLedgerEntry)>) -> LedgerSnapshot {
    LedgerSnapshot {
        purchases: Some(
            entries
                .into_iter()
                .map(|(id, e)| (id.to_string(), e))
                .collect::<BTreeMap<_, _>>(),
        ),
        assets: None,
        total_count: None,
    }
}

pub fn snapshot_with_catalog(
    entries: Vec<(&str, RawLedgerEntry)>,
    catalog_entries: Vec<AssetMetadata>,
) -> LedgerSnapshot {
    let mut snapshot = snapshot(entries);
    let mut catalog = AssetCatalog::default();
    {
        let bucket = catalog
            .0
            .entry(GAME.to_string())
            .or_default()
            .entry(CONTEXT.to_string())
            .or_default();
        for meta in catalog_entries {
            bucket.insert(meta.asset_id.clone(), meta);
        }
    }
    snapshot.assets = Some(catalog);
    snapshot
}

pub fn metadata(asset_id: &str, original_id: Option<&str>, name: &str) -> AssetMetadata {
    AssetMetadata {
        asset_id: AssetId::from(asset_id),
        original_id: original_id.map(AssetId::from),
        market_name: Some(name.to_string()),
        icon_url: None,
    }
}

pub fn holdings(asset_ids: &[&str]) -> HoldingsSnapshot {
    HoldingsSnapshot::new(
        asset_ids
            .iter()
            .map(|id| HoldingItem {
                asset_id: AssetId::from(*id),
                market_name: None,
                icon_url: Some(format!("https://icons.example/{id}.png")),
            })
            .collect(),
    )
}
