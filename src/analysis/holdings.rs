//! Cross-reference purchase history against current holdings to split
//! purchases into "still owned" and "disposed through an untracked channel".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::share_percent_string;
use crate::models::{AssetId, HoldingsSnapshot};

use super::{LinkStatus, LinkedTransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// The post-disposal id is present in current holdings; the item is
    /// still owned by the account.
    Purchased,
    /// The id is absent: the item left through a channel this analysis
    /// cannot see (trade, consumption, gifting away).
    OtherSource,
}

/// One eligible purchase annotated with its holdings-match outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Record id of the originating purchase transaction.
    pub record_id: String,
    pub status: LinkStatus,
    pub game_id: String,
    pub asset_id: AssetId,
    pub post_disposal_id: AssetId,
    pub market_name: String,
    pub paid_total: Decimal,
    pub currency_id: String,
    pub match_type: MatchType,
    /// Unix timestamp of the purchase entry's completion.
    pub time_completed: i64,
    /// Icon carried over from the holdings snapshot for matched items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Partition of eligible purchases into matched and unmatched, with counts
/// and derived percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<MatchRecord>,
    pub unmatched: Vec<MatchRecord>,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub total_eligible: usize,
    /// Two-decimal percent string, `"0%"` when there are no eligible
    /// purchases.
    pub matched_percent: String,
    pub unmatched_percent: String,
}

/// Match parsed purchases against a holdings snapshot.
///
/// Only purchase legs that carry a post-disposal id participate: a purchase
/// that never disposed has no current identity to probe with. Both
/// `completed` and `uncompleted` purchase legs are eligible, since either
/// may still be sitting in the account's inventory awaiting a future sale.
pub fn match_holdings(
    transactions: &[LinkedTransactionRecord],
    holdings: &HoldingsSnapshot,
) -> MatchResult {
    let index = holdings.index();

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for record in transactions {
        let Some(purchase) = record.purchase.as_ref() else {
            continue;
        };
        let Some(post_id) = purchase.raw.asset.post_disposal_id.as_ref() else {
            continue;
        };

        let holding = index.get(post_id).copied();
        let match_type = if holding.is_some() {
            MatchType::Purchased
        } else {
            MatchType::OtherSource
        };
        let entry = MatchRecord {
            record_id: purchase.record_id.clone(),
            status: record.status,
            game_id: purchase.raw.asset.game_id.clone(),
            asset_id: purchase.raw.asset.asset_id.clone(),
            post_disposal_id: post_id.clone(),
            market_name: purchase.market_name.clone(),
            paid_total: purchase.paid_total,
            currency_id: purchase.currency_id.clone(),
            match_type,
            time_completed: purchase.time_completed,
            icon_url: holding.and_then(|h| h.icon_url.clone()),
        };
        match match_type {
            MatchType::Purchased => matched.push(entry),
            MatchType::OtherSource => unmatched.push(entry),
        }
    }

    let matched_count = matched.len();
    let unmatched_count = unmatched.len();
    let total_eligible = matched_count + unmatched_count;

    MatchResult {
        matched,
        unmatched,
        matched_count,
        unmatched_count,
        total_eligible,
        matched_percent: share_percent_string(matched_count, total_eligible),
        unmatched_percent: share_percent_string(unmatched_count, total_eligible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ParsedTransaction, TransactionRole};
    use crate::models::{AccountId, AssetReference, HoldingItem, RawLedgerEntry};

    fn purchase(record_id: &str, asset_id: &str, post_disposal_id: Option<&str>) -> ParsedTransaction {
        let raw = RawLedgerEntry {
            purchaser_id: AccountId::from("me"),
            asset: AssetReference {
                game_id: "730".to_string(),
                context_id: "2".to_string(),
                asset_id: AssetId::from(asset_id),
                post_disposal_id: post_disposal_id.map(AssetId::from),
            },
            market_name: None,
            paid_amount: Decimal::from(10),
            paid_fee: Decimal::ONE,
            currency_id: "1".to_string(),
            time_completed: 1_700_000_000,
            received_amount: None,
            received_currency_id: None,
        };
        ParsedTransaction {
            record_id: record_id.to_string(),
            role: TransactionRole::Purchase,
            market_name: "Test Item".to_string(),
            paid_amount: raw.paid_amount,
            paid_fee: raw.paid_fee,
            paid_total: raw.paid_total(),
            currency_id: raw.currency_id.clone(),
            time_completed: raw.time_completed,
            raw,
        }
    }

    fn holding(asset_id: &str) -> HoldingItem {
        HoldingItem {
            asset_id: AssetId::from(asset_id),
            market_name: Some("Test Item".to_string()),
            icon_url: Some("https://icons.example/i.png".to_string()),
        }
    }

    #[test]
    fn held_item_matches_as_purchased_with_icon() {
        let transactions = vec![LinkedTransactionRecord::uncompleted(purchase(
            "p1",
            "X",
            Some("X2"),
        ))];
        let holdings = HoldingsSnapshot::new(vec![holding("X2")]);

        let result = match_holdings(&transactions, &holdings);
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.unmatched_count, 0);
        assert_eq!(result.matched[0].match_type, MatchType::Purchased);
        assert_eq!(
            result.matched[0].icon_url.as_deref(),
            Some("https://icons.example/i.png")
        );
        assert_eq!(result.matched_percent, "100.00%");
    }

    #[test]
    fn absent_item_is_unmatched_other_source() {
        let transactions = vec![LinkedTransactionRecord::uncompleted(purchase(
            "p1",
            "X",
            Some("X2"),
        ))];
        let holdings = HoldingsSnapshot::default();

        let result = match_holdings(&transactions, &holdings);
        assert_eq!(result.unmatched_count, 1);
        assert_eq!(result.unmatched[0].match_type, MatchType::OtherSource);
        assert!(result.unmatched[0].icon_url.is_none());
        assert_eq!(result.unmatched_percent, "100.00%");
        assert_eq!(result.matched_percent, "0.00%");
    }

    #[test]
    fn purchases_without_post_disposal_id_are_not_eligible() {
        let transactions = vec![LinkedTransactionRecord::uncompleted(purchase("p1", "X", None))];
        let holdings = HoldingsSnapshot::new(vec![holding("X")]);

        let result = match_holdings(&transactions, &holdings);
        assert_eq!(result.total_eligible, 0);
        assert_eq!(result.matched_percent, "0%");
        assert_eq!(result.unmatched_percent, "0%");
    }

    #[test]
    fn completed_purchase_legs_are_eligible_too() {
        let sale = {
            let mut tx = purchase("s1", "X2", None);
            tx.role = TransactionRole::Sale;
            tx
        };
        let transactions = vec![LinkedTransactionRecord::completed(
            purchase("p1", "X", Some("X2")),
            sale,
        )];
        let holdings = HoldingsSnapshot::new(vec![holding("X2")]);

        let result = match_holdings(&transactions, &holdings);
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.matched[0].status, LinkStatus::Completed);
    }

    #[test]
    fn received_records_never_participate() {
        let sale = {
            let mut tx = purchase("s1", "Z9", None);
            tx.role = TransactionRole::Sale;
            tx
        };
        let transactions = vec![LinkedTransactionRecord::received(sale)];
        let holdings = HoldingsSnapshot::new(vec![holding("Z9")]);

        let result = match_holdings(&transactions, &holdings);
        assert_eq!(result.total_eligible, 0);
    }
}
