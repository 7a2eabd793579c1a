//! Per-pair profitability for completed purchase/sale links.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::percent_of;

use super::{LinkStatus, LinkedTransactionRecord};

/// Profit and return for one completed purchase/sale pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRecord {
    pub market_name: String,
    pub game_id: String,
    /// Purchase paid total (amount + fee).
    pub buy_price: Decimal,
    /// Sale received amount; 0 when the feed omitted it.
    pub sell_price: Decimal,
    pub profit: Decimal,
    /// `profit / buy_price * 100`, rounded to two decimals; 0 when the buy
    /// price is zero.
    pub roi_percent: Decimal,
    pub purchased_at: i64,
    pub sold_at: i64,
}

/// Compute ROI records for every completed link.
///
/// `uncompleted` records have no disposal price and `received` records no
/// acquisition price, so ROI is undefined for both and they yield nothing.
pub fn compute_roi(transactions: &[LinkedTransactionRecord]) -> Vec<RoiRecord> {
    transactions
        .iter()
        .filter(|record| record.status == LinkStatus::Completed)
        .filter_map(|record| {
            let purchase = record.purchase.as_ref()?;
            let sale = record.sale.as_ref()?;

            let buy_price = purchase.paid_total;
            let sell_price = sale.raw.received_amount.unwrap_or(Decimal::ZERO);
            let profit = sell_price - buy_price;

            Some(RoiRecord {
                market_name: purchase.market_name.clone(),
                game_id: purchase.raw.asset.game_id.clone(),
                buy_price,
                sell_price,
                profit,
                roi_percent: percent_of(profit, buy_price),
                purchased_at: purchase.time_completed,
                sold_at: sale.time_completed,
            })
        })
        .collect()
}
