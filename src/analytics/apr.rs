use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{OptionsTrade, TradeStatus};

/// Underlying units per equity option contract.
const CONTRACT_MULTIPLIER: i64 = 100;
const DAYS_PER_YEAR: i64 = 365;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Raw values the APR formula reads. Built from a stored trade or from a
/// creation request plus a reference timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AprInputs {
    pub strike_price: Decimal,
    pub contracts: i32,
    pub premium: Decimal,
    pub fees: Option<Decimal>,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub date_closed: Option<NaiveDate>,
}

impl AprInputs {
    /// Annualized return in percent, full precision.
    ///
    /// `None` unless the trade is CLOSED with a close date and has a positive
    /// capital requirement. Arithmetic overflow also yields `None`.
    pub fn compute(&self) -> Option<Decimal> {
        if self.status != TradeStatus::Closed || self.contracts < 1 {
            return None;
        }
        let date_closed = self.date_closed?;

        let capital = capital_required(self.strike_price, self.contracts)?;
        if capital <= Decimal::ZERO {
            return None;
        }

        let net = self
            .premium
            .checked_sub(self.fees.unwrap_or(Decimal::ZERO))?;
        let days = Decimal::from(days_held(self.created_at, date_closed));

        let annualization = Decimal::from(DAYS_PER_YEAR).checked_div(days)?;
        net.checked_div(capital)?
            .checked_mul(annualization)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

impl From<&OptionsTrade> for AprInputs {
    fn from(trade: &OptionsTrade) -> Self {
        trade.apr_inputs()
    }
}

/// APR for a stored trade, measured from its own `created_at`.
pub fn compute_apr(trade: &OptionsTrade) -> Option<Decimal> {
    AprInputs::from(trade).compute()
}

/// strike × contracts × 100.
pub fn capital_required(strike_price: Decimal, contracts: i32) -> Option<Decimal> {
    strike_price
        .checked_mul(Decimal::from(contracts))?
        .checked_mul(Decimal::from(CONTRACT_MULTIPLIER))
}

/// Whole days from `created_at` to midnight UTC of `date_closed`, rounded
/// up, never less than 1.
pub fn days_held(created_at: DateTime<Utc>, date_closed: NaiveDate) -> i64 {
    let closed_at = date_closed.and_time(NaiveTime::MIN).and_utc();
    let millis = (closed_at - created_at).num_milliseconds();
    let days = if millis <= 0 {
        0
    } else {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    };
    days.max(1)
}

/// Two decimal places, midpoint away from zero.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_percentage(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", round_for_display(v)),
        None => "N/A".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
