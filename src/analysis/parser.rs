//! Ledger parsing: classify raw entries into purchases and sales, resolve
//! item identity across the pre- and post-disposal id spaces, and link each
//! purchase to the sale that disposed of it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AnalysisError;
use crate::models::{AccountId, AssetCatalog, AssetId, LedgerSnapshot, RawLedgerEntry};

/// Placeholder display name when the catalog cannot resolve an asset.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionRole {
    Purchase,
    Sale,
}

/// Outcome of linking a parsed transaction to its counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Purchase whose post-disposal id matched a sale; both legs present.
    Completed,
    /// Purchase with no matching sale; the item has not been resold yet.
    Uncompleted,
    /// Sale with no matching purchase; the item arrived from outside the
    /// tracked purchase history (drop, gift, trade).
    Received,
}

/// A classified ledger entry. Derived 1:1 from a [`RawLedgerEntry`] and
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// The raw entry's key in the ledger snapshot.
    pub record_id: String,
    pub role: TransactionRole,
    pub market_name: String,
    pub paid_amount: Decimal,
    pub paid_fee: Decimal,
    /// `paid_amount + paid_fee`.
    pub paid_total: Decimal,
    pub currency_id: String,
    /// Unix timestamp (seconds) of completion.
    pub time_completed: i64,
    /// The raw entry, kept for fields only downstream consumers need
    /// (received amount, purchaser id, asset reference).
    pub raw: RawLedgerEntry,
}

/// One or two parsed transactions joined by item identity.
///
/// Which legs are present is determined by `status`: `completed` carries
/// both, `uncompleted` only the purchase, `received` only the sale. Every
/// parsed transaction appears in exactly one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedTransactionRecord {
    pub status: LinkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase: Option<ParsedTransaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale: Option<ParsedTransaction>,
}

impl LinkedTransactionRecord {
    pub fn completed(purchase: ParsedTransaction, sale: ParsedTransaction) -> Self {
        Self {
            status: LinkStatus::Completed,
            purchase: Some(purchase),
            sale: Some(sale),
        }
    }

    pub fn uncompleted(purchase: ParsedTransaction) -> Self {
        Self {
            status: LinkStatus::Uncompleted,
            purchase: Some(purchase),
            sale: None,
        }
    }

    pub fn received(sale: ParsedTransaction) -> Self {
        Self {
            status: LinkStatus::Received,
            purchase: None,
            sale: Some(sale),
        }
    }

    /// Stable id for this record: the purchase leg's record id when present,
    /// otherwise the sale leg's.
    pub fn record_id(&self) -> &str {
        self.purchase
            .as_ref()
            .or(self.sale.as_ref())
            .map(|t| t.record_id.as_str())
            .unwrap_or_default()
    }
}

/// Summary counts for one parse run.
///
/// `transaction_count` counts parsed transactions before linking
/// (purchases + sales), not linked records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub transaction_count: usize,
    pub purchase_count: usize,
    pub sale_count: usize,
    pub completed_count: usize,
    pub uncompleted_count: usize,
    pub received_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub transactions: Vec<LinkedTransactionRecord>,
    pub summary: ParseSummary,
}

/// Parse a ledger snapshot into linked transaction records for one account.
///
/// Entries whose purchaser id equals `account` are purchases by that
/// account; everything else is a sale by it. The same marketplace-wide
/// ledger parsed with a different account id yields a different partition.
///
/// Purchases are processed in stable record-id order; when several
/// purchases carry the same post-disposal id (bad upstream data, but not
/// assumed impossible) the first claims the sale and the rest fall through
/// to `uncompleted`.
pub fn parse_ledger(
    snapshot: &LedgerSnapshot,
    account: &AccountId,
) -> Result<ParseResult, AnalysisError> {
    let entries = snapshot.purchases.as_ref().ok_or_else(|| {
        AnalysisError::InvalidInput("ledger snapshot has no purchases collection".to_string())
    })?;
    let catalog = snapshot.assets.as_ref();

    let mut purchases: Vec<ParsedTransaction> = Vec::new();
    let mut sales: Vec<Option<ParsedTransaction>> = Vec::new();

    for (record_id, entry) in entries {
        let role = if entry.purchaser_id == *account {
            TransactionRole::Purchase
        } else {
            TransactionRole::Sale
        };
        let market_name = resolve_market_name(catalog, record_id, entry);
        let parsed = ParsedTransaction {
            record_id: record_id.clone(),
            role,
            market_name,
            paid_amount: entry.paid_amount,
            paid_fee: entry.paid_fee,
            paid_total: entry.paid_total(),
            currency_id: entry.currency_id.clone(),
            time_completed: entry.time_completed,
            raw: entry.clone(),
        };
        match role {
            TransactionRole::Purchase => purchases.push(parsed),
            TransactionRole::Sale => sales.push(Some(parsed)),
        }
    }

    let purchase_count = purchases.len();
    let sale_count = sales.len();

    // Sales indexed by their asset id; linking probes this with each
    // purchase's post-disposal id. First occurrence wins on duplicate ids.
    let mut sale_index: HashMap<AssetId, usize> = HashMap::with_capacity(sales.len());
    for (pos, sale) in sales.iter().enumerate() {
        if let Some(sale) = sale {
            sale_index
                .entry(sale.raw.asset.asset_id.clone())
                .or_insert(pos);
        }
    }

    let mut transactions = Vec::with_capacity(purchase_count + sale_count);
    let mut completed_count = 0;
    let mut uncompleted_count = 0;

    for purchase in purchases {
        let counterpart = purchase
            .raw
            .asset
            .post_disposal_id
            .as_ref()
            .and_then(|post_id| sale_index.get(post_id))
            // A sale already claimed by an earlier purchase stays consumed.
            .and_then(|&pos| sales[pos].take());
        match counterpart {
            Some(sale) => {
                completed_count += 1;
                transactions.push(LinkedTransactionRecord::completed(purchase, sale));
            }
            None => {
                uncompleted_count += 1;
                transactions.push(LinkedTransactionRecord::uncompleted(purchase));
            }
        }
    }

    let mut received_count = 0;
    for sale in sales.into_iter().flatten() {
        received_count += 1;
        transactions.push(LinkedTransactionRecord::received(sale));
    }

    Ok(ParseResult {
        transactions,
        summary: ParseSummary {
            transaction_count: purchase_count + sale_count,
            purchase_count,
            sale_count,
            completed_count,
            uncompleted_count,
            received_count,
        },
    })
}

/// Resolve a display name for one entry.
///
/// Lookup order: catalog by asset id, catalog by recorded pre-disposal id
/// (sales are cataloged under their post-disposal id), the entry's own
/// market-name field, and finally the [`UNKNOWN_ITEM`] placeholder with a
/// warning. Name resolution never fails the parse.
fn resolve_market_name(
    catalog: Option<&AssetCatalog>,
    record_id: &str,
    entry: &RawLedgerEntry,
) -> String {
    let asset = &entry.asset;
    if let Some(catalog) = catalog {
        let resolved = catalog
            .get(&asset.game_id, &asset.context_id, &asset.asset_id)
            .or_else(|| {
                catalog.find_by_original_id(&asset.game_id, &asset.context_id, &asset.asset_id)
            })
            .and_then(|meta| meta.market_name.as_deref());
        if let Some(name) = resolved {
            return name.to_string();
        }
    }
    if let Some(name) = entry.market_name.as_deref() {
        return name.to_string();
    }
    warn!(
        record_id,
        asset_id = %asset.asset_id,
        game_id = %asset.game_id,
        "could not resolve display name for ledger entry"
    );
    UNKNOWN_ITEM.to_string()
}
