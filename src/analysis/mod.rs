// src/analysis/mod.rs
mod holdings;
mod parser;
mod report;
mod roi;
mod stats;

pub use holdings::{match_holdings, MatchRecord, MatchResult, MatchType};
pub use parser::{
    parse_ledger, LinkStatus, LinkedTransactionRecord, ParseResult, ParseSummary,
    ParsedTransaction, TransactionRole, UNKNOWN_ITEM,
};
pub use report::{build_report, AnalysisReport};
pub use roi::{compute_roi, RoiRecord};
pub use stats::{aggregate, AccountStatistics, ItemStatistics, OverallStatistics, TraceEntry};
