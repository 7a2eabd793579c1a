// src/fetch/mod.rs
mod marketplace;

pub use marketplace::MarketplaceClient;

use anyhow::Result;

use crate::models::{HoldingsSnapshot, LedgerSnapshot};

/// Source of the snapshots the analysis engine consumes.
///
/// Implementations own all network concerns (pagination, throttling,
/// sessions); the engine only ever sees complete snapshots.
#[async_trait::async_trait]
pub trait LedgerSource: Send + Sync {
    /// Human-readable name for this source.
    fn name(&self) -> &str;

    /// Fetch the complete transaction ledger for the configured account.
    async fn fetch_ledger(&self) -> Result<LedgerSnapshot>;

    /// Fetch the account's current inventory.
    async fn fetch_holdings(&self) -> Result<HoldingsSnapshot>;
}
