use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{OptionsTrade, TradeAction, TradeStatus};

/// Aggregate view over a trade list.
///
/// Money totals are `None` when they do not fit in a `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub total_trades: i64,
    pub open: i64,
    pub closed: i64,
    pub expired: i64,
    pub assigned: i64,
    /// Premium collected on SELL trades minus premium paid on BUY trades.
    pub total_premium: Option<Decimal>,
    pub total_fees: Option<Decimal>,
    pub net_premium: Option<Decimal>,
    pub trades_with_apr: i64,
    pub average_apr: Option<Decimal>,
    pub best_apr: Option<Decimal>,
    pub worst_apr: Option<Decimal>,
}

impl TradeSummary {
    pub fn from_trades(trades: &[OptionsTrade]) -> Self {
        let count = |status: TradeStatus| trades.iter().filter(|t| t.status == status).count() as i64;

        let total_premium = checked_sum(trades.iter().map(|t| match t.action {
            TradeAction::Sell => t.premium,
            TradeAction::Buy => -t.premium,
        }));
        let total_fees = checked_sum(trades.iter().map(|t| t.fees));
        let net_premium = total_premium.zip(total_fees).and_then(|(p, f)| p.checked_sub(f));

        let aprs: Vec<Decimal> = trades.iter().filter_map(|t| t.effective_apr()).collect();
        let average_apr = if aprs.is_empty() {
            None
        } else {
            checked_sum(aprs.iter().copied())
                .and_then(|sum| sum.checked_div(Decimal::from(aprs.len() as i64)))
        };

        TradeSummary {
            total_trades: trades.len() as i64,
            open: count(TradeStatus::Open),
            closed: count(TradeStatus::Closed),
            expired: count(TradeStatus::Expired),
            assigned: count(TradeStatus::Assigned),
            total_premium,
            total_fees,
            net_premium,
            trades_with_apr: aprs.len() as i64,
            average_apr,
            best_apr: aprs.iter().copied().max(),
            worst_apr: aprs.iter().copied().min(),
        }
    }
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
