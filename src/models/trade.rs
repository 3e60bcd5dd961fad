use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analytics::apr::{self, AprInputs};
use crate::models::{OptionType, TradeAction, TradeStatus};

/// Database row for options_trades table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OptionsTrade {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub symbol: String,
    #[sqlx(try_from = "String")]
    pub option_type: OptionType,
    pub strike_price: Decimal,
    pub expiration_date: Option<NaiveDate>,
    pub premium: Decimal,
    pub contracts: i32,
    #[sqlx(try_from = "String")]
    pub action: TradeAction,
    #[sqlx(try_from = "String")]
    pub status: TradeStatus,
    pub fees: Decimal,
    pub date_closed: Option<NaiveDate>,
    pub apr: Option<Decimal>,
}

impl OptionsTrade {
    pub fn apr_inputs(&self) -> AprInputs {
        AprInputs {
            strike_price: self.strike_price,
            contracts: self.contracts,
            premium: self.premium,
            fees: Some(self.fees),
            status: self.status,
            created_at: self.created_at,
            date_closed: self.date_closed,
        }
    }

    /// Stored APR if present, otherwise recomputed from the row.
    pub fn effective_apr(&self) -> Option<Decimal> {
        self.apr.or_else(|| apr::compute_apr(self))
    }
}

/// Validated creation request. Produced only by `TradeDraft::commit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrade {
    pub symbol: String,
    pub option_type: OptionType,
    pub strike_price: Decimal,
    pub expiration_date: Option<NaiveDate>,
    pub premium: Decimal,
    pub contracts: i32,
    pub action: TradeAction,
    pub status: TradeStatus,
    pub fees: Decimal,
    pub date_closed: Option<NaiveDate>,
}

impl NewTrade {
    /// APR inputs for this request as if it were persisted at `created_at`.
    pub fn apr_inputs(&self, created_at: DateTime<Utc>) -> AprInputs {
        AprInputs {
            strike_price: self.strike_price,
            contracts: self.contracts,
            premium: self.premium,
            fees: Some(self.fees),
            status: self.status,
            created_at,
            date_closed: self.date_closed,
        }
    }
}

/// List/feed representation of a trade with its display APR.
#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    #[serde(flatten)]
    pub trade: OptionsTrade,
    pub effective_apr: Option<Decimal>,
    pub apr_display: String,
}

impl From<OptionsTrade> for TradeView {
    fn from(trade: OptionsTrade) -> Self {
        let effective_apr = trade.effective_apr();
        Self {
            apr_display: apr::format_percentage(effective_apr),
            effective_apr,
            trade,
        }
    }
}
