//! One-call combinator over the four analysis components.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::{AccountId, HoldingsSnapshot, LedgerSnapshot};

use super::{
    aggregate, compute_roi, match_holdings, parse_ledger, AccountStatistics, MatchResult,
    ParseResult, RoiRecord,
};

/// Combined output of one analysis run for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub parse: ParseResult,
    pub holdings: MatchResult,
    pub roi: Vec<RoiRecord>,
    pub statistics: AccountStatistics,
}

/// Run the full pipeline: parse, then the three independent consumers of
/// the transaction list. Pure and synchronous; safe to call concurrently
/// for different accounts.
pub fn build_report(
    ledger: &LedgerSnapshot,
    holdings: &HoldingsSnapshot,
    account: &AccountId,
) -> Result<AnalysisReport, AnalysisError> {
    let parse = parse_ledger(ledger, account)?;
    let holdings = match_holdings(&parse.transactions, holdings);
    let roi = compute_roi(&parse.transactions);
    let statistics = aggregate(&parse);

    Ok(AnalysisReport {
        parse,
        holdings,
        roi,
        statistics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_fails_while_empty_ledger_succeeds() {
        let account = AccountId::from("me");
        let holdings = HoldingsSnapshot::default();

        let missing = LedgerSnapshot::default();
        assert!(build_report(&missing, &holdings, &account).is_err());

        let empty = LedgerSnapshot {
            purchases: Some(Default::default()),
            assets: None,
            total_count: None,
        };
        let report = build_report(&empty, &holdings, &account).unwrap();
        assert!(report.parse.transactions.is_empty());
        assert!(report.roi.is_empty());
        assert_eq!(report.holdings.matched_percent, "0%");
        assert_eq!(report.statistics.overall.roi_percent, rust_decimal::Decimal::ZERO);
    }
}
