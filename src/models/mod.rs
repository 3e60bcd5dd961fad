pub mod draft;
pub mod trade;

pub use draft::{DraftError, DraftField, TradeDraft, ValidationPolicy};
pub use trade::{NewTrade, OptionsTrade, TradeView};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Returned when a stored or submitted enum value is not one of the known names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// OptionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Put,
    Call,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Put => "PUT",
            OptionType::Call => "CALL",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PUT" => Some(OptionType::Put),
            "CALL" => Some(OptionType::Call),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TradeAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Sell,
    Buy,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Sell => "SELL",
            TradeAction::Buy => "BUY",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SELL" => Some(TradeAction::Sell),
            "BUY" => Some(TradeAction::Buy),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TradeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Open,
    Closed,
    Expired,
    Assigned,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
            TradeStatus::Expired => "EXPIRED",
            TradeStatus::Assigned => "ASSIGNED",
        }
    }

    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => Some(TradeStatus::Open),
            "CLOSED" => Some(TradeStatus::Closed),
            "EXPIRED" => Some(TradeStatus::Expired),
            "ASSIGNED" => Some(TradeStatus::Assigned),
            _ => None,
        }
    }
}

// Display + TryFrom<String> for all three; the String conversion is what
// `#[sqlx(try_from = "String")]` uses when decoding TEXT columns.
macro_rules! text_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $ty {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $ty::from_api_str(&value).ok_or(UnknownVariant { kind: $kind, value })
            }
        }
    };
}

text_enum!(OptionType, "option type");
text_enum!(TradeAction, "action");
text_enum!(TradeStatus, "status");
