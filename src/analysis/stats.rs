//! Fold the full transaction list into per-item and account-wide totals.

use std::collections::BTreeMap;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::percent_of;
use crate::models::AccountId;

use super::{LinkStatus, ParseResult, ParsedTransaction, TransactionRole};

/// Normalized per-item trace of one ledger leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: TransactionRole,
    pub time_completed: i64,
    /// ISO date (`YYYY-MM-DD`) derived from the unix timestamp.
    pub date: String,
    pub currency_id: String,
    /// Purchaser of the item; carried for sale legs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchaser_id: Option<AccountId>,
}

/// Accumulated totals for one display name.
///
/// Status counters count transaction legs, so a completed pair contributes
/// one purchase leg and one sale leg to its item's `completed_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStatistics {
    pub invested: Decimal,
    pub received: Decimal,
    pub purchase_count: usize,
    pub sale_count: usize,
    pub completed_count: usize,
    pub uncompleted_count: usize,
    pub received_count: usize,
    pub transactions: Vec<TraceEntry>,
}

/// Account-wide rollup.
///
/// The counts are taken from the parser's [`super::ParseSummary`] as-is;
/// the aggregator trusts them and only computes the monetary totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_invested: Decimal,
    pub total_received: Decimal,
    pub total_profit: Decimal,
    /// `total_profit / total_invested * 100`, two decimals; 0 when nothing
    /// was invested.
    pub roi_percent: Decimal,
    pub transaction_count: usize,
    pub purchase_count: usize,
    pub sale_count: usize,
    pub completed_count: usize,
    pub uncompleted_count: usize,
    pub received_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStatistics {
    pub overall: OverallStatistics,
    /// Per-item breakdown keyed by resolved display name.
    pub items: BTreeMap<String, ItemStatistics>,
}

/// Single pass over the parse result, folding each transaction leg into its
/// display-name accumulator and the running overall totals.
pub fn aggregate(result: &ParseResult) -> AccountStatistics {
    let mut items: BTreeMap<String, ItemStatistics> = BTreeMap::new();
    let mut total_invested = Decimal::ZERO;
    let mut total_received = Decimal::ZERO;

    for record in &result.transactions {
        if let Some(purchase) = record.purchase.as_ref() {
            let item = items.entry(purchase.market_name.clone()).or_default();
            item.invested += purchase.paid_total;
            item.purchase_count += 1;
            bump_status(item, record.status);
            item.transactions.push(trace_entry(purchase, None));
            total_invested += purchase.paid_total;
        }
        if let Some(sale) = record.sale.as_ref() {
            let amount = sale.raw.received_amount.unwrap_or(Decimal::ZERO);
            let item = items.entry(sale.market_name.clone()).or_default();
            item.received += amount;
            item.sale_count += 1;
            bump_status(item, record.status);
            item.transactions
                .push(trace_entry(sale, Some(sale.raw.purchaser_id.clone())));
            total_received += amount;
        }
    }

    let total_profit = total_received - total_invested;
    let summary = result.summary;

    AccountStatistics {
        overall: OverallStatistics {
            total_invested,
            total_received,
            total_profit,
            roi_percent: percent_of(total_profit, total_invested),
            transaction_count: summary.transaction_count,
            purchase_count: summary.purchase_count,
            sale_count: summary.sale_count,
            completed_count: summary.completed_count,
            uncompleted_count: summary.uncompleted_count,
            received_count: summary.received_count,
        },
        items,
    }
}

fn bump_status(item: &mut ItemStatistics, status: LinkStatus) {
    match status {
        LinkStatus::Completed => item.completed_count += 1,
        LinkStatus::Uncompleted => item.uncompleted_count += 1,
        LinkStatus::Received => item.received_count += 1,
    }
}

fn trace_entry(leg: &ParsedTransaction, purchaser_id: Option<AccountId>) -> TraceEntry {
    TraceEntry {
        kind: leg.role,
        time_completed: leg.time_completed,
        date: iso_date(leg.time_completed),
        currency_id: leg.currency_id.clone(),
        purchaser_id,
    }
}

fn iso_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_default()
}
