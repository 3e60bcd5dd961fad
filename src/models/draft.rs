//! Staging record for trade entry.
//!
//! A `TradeDraft` carries the raw text of every input field. It is never
//! mutated in place: `with_field` returns a new draft, and `commit` is the
//! only way to turn it into a typed `NewTrade`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{NewTrade, OptionType, TradeAction, TradeStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";
/// Ceiling for strike, premium and fees. Keeps capital and totals well inside `Decimal`.
const MAX_AMOUNT: i64 = 1_000_000_000;
const MAX_CONTRACTS: i32 = 1_000_000;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Symbol,
    OptionType,
    StrikePrice,
    ExpirationDate,
    Premium,
    Contracts,
    Action,
    Status,
    Fees,
    DateClosed,
}

impl DraftField {
    pub const ALL: [DraftField; 10] = [
        DraftField::Symbol,
        DraftField::OptionType,
        DraftField::StrikePrice,
        DraftField::ExpirationDate,
        DraftField::Premium,
        DraftField::Contracts,
        DraftField::Action,
        DraftField::Status,
        DraftField::Fees,
        DraftField::DateClosed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Symbol => "symbol",
            DraftField::OptionType => "option_type",
            DraftField::StrikePrice => "strike_price",
            DraftField::ExpirationDate => "expiration_date",
            DraftField::Premium => "premium",
            DraftField::Contracts => "contracts",
            DraftField::Action => "action",
            DraftField::Status => "status",
            DraftField::Fees => "fees",
            DraftField::DateClosed => "date_closed",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Policy + errors
// ---------------------------------------------------------------------------

/// Which optional fields must be filled in before a draft can be committed.
/// `symbol`, `strike_price` and `premium` are always required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub require_expiration_date: bool,
    pub require_fees: bool,
    pub require_date_closed_when_closed: bool,
}

impl ValidationPolicy {
    pub fn strict() -> Self {
        Self {
            require_expiration_date: true,
            require_fees: true,
            require_date_closed_when_closed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(DraftField),

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: DraftField, value: String },

    #[error("{field} must be a date (YYYY-MM-DD), got {value:?}")]
    InvalidDate { field: DraftField, value: String },

    #[error("{field} has unknown value {value:?}")]
    InvalidChoice { field: DraftField, value: String },

    #[error("{field} {reason}")]
    OutOfRange { field: DraftField, reason: &'static str },

    #[error("date_closed is only allowed when status is CLOSED")]
    DateClosedWhileNotClosed,
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeDraft {
    #[serde(deserialize_with = "raw_text")]
    pub symbol: String,
    #[serde(deserialize_with = "raw_text")]
    pub option_type: String,
    #[serde(deserialize_with = "raw_text")]
    pub strike_price: String,
    #[serde(deserialize_with = "raw_text")]
    pub expiration_date: String,
    #[serde(deserialize_with = "raw_text")]
    pub premium: String,
    #[serde(deserialize_with = "raw_text")]
    pub contracts: String,
    #[serde(deserialize_with = "raw_text")]
    pub action: String,
    #[serde(deserialize_with = "raw_text")]
    pub status: String,
    #[serde(deserialize_with = "raw_text")]
    pub fees: String,
    #[serde(deserialize_with = "raw_text")]
    pub date_closed: String,
}

impl Default for TradeDraft {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            option_type: OptionType::Put.to_string(),
            strike_price: String::new(),
            expiration_date: String::new(),
            premium: String::new(),
            contracts: "1".into(),
            action: TradeAction::Sell.to_string(),
            status: TradeStatus::Open.to_string(),
            fees: String::new(),
            date_closed: String::new(),
        }
    }
}

impl TradeDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Symbol => &self.symbol,
            DraftField::OptionType => &self.option_type,
            DraftField::StrikePrice => &self.strike_price,
            DraftField::ExpirationDate => &self.expiration_date,
            DraftField::Premium => &self.premium,
            DraftField::Contracts => &self.contracts,
            DraftField::Action => &self.action,
            DraftField::Status => &self.status,
            DraftField::Fees => &self.fees,
            DraftField::DateClosed => &self.date_closed,
        }
    }

    /// Copy of this draft with one field replaced.
    #[must_use]
    pub fn with_field(&self, field: DraftField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            DraftField::Symbol => &mut next.symbol,
            DraftField::OptionType => &mut next.option_type,
            DraftField::StrikePrice => &mut next.strike_price,
            DraftField::ExpirationDate => &mut next.expiration_date,
            DraftField::Premium => &mut next.premium,
            DraftField::Contracts => &mut next.contracts,
            DraftField::Action => &mut next.action,
            DraftField::Status => &mut next.status,
            DraftField::Fees => &mut next.fees,
            DraftField::DateClosed => &mut next.date_closed,
        };
        *slot = value.into();
        next
    }

    /// Validate every field and produce a creation request.
    pub fn commit(&self, policy: &ValidationPolicy) -> Result<NewTrade, DraftError> {
        let symbol = self.required(DraftField::Symbol)?.to_uppercase();

        let strike_price = parse_amount(DraftField::StrikePrice, self.required(DraftField::StrikePrice)?)?;
        if strike_price <= Decimal::ZERO {
            return Err(DraftError::OutOfRange {
                field: DraftField::StrikePrice,
                reason: "must be greater than zero",
            });
        }

        let premium = parse_amount(DraftField::Premium, self.required(DraftField::Premium)?)?;
        if premium < Decimal::ZERO {
            return Err(DraftError::OutOfRange {
                field: DraftField::Premium,
                reason: "must not be negative",
            });
        }

        let contracts = match self.optional(DraftField::Contracts) {
            None => 1,
            Some(raw) => i32::from_str(raw).map_err(|_| DraftError::InvalidNumber {
                field: DraftField::Contracts,
                value: raw.to_string(),
            })?,
        };
        if contracts < 1 {
            return Err(DraftError::OutOfRange {
                field: DraftField::Contracts,
                reason: "must be at least 1",
            });
        }
        if contracts > MAX_CONTRACTS {
            return Err(DraftError::OutOfRange {
                field: DraftField::Contracts,
                reason: "must not exceed 1000000",
            });
        }

        let fees = match self.optional(DraftField::Fees) {
            None if policy.require_fees => return Err(DraftError::MissingField(DraftField::Fees)),
            None => Decimal::ZERO,
            Some(raw) => parse_amount(DraftField::Fees, raw)?,
        };
        if fees < Decimal::ZERO {
            return Err(DraftError::OutOfRange {
                field: DraftField::Fees,
                reason: "must not be negative",
            });
        }

        let option_type = self.choice(DraftField::OptionType, OptionType::from_api_str)?;
        let action = self.choice(DraftField::Action, TradeAction::from_api_str)?;
        let status = self.choice(DraftField::Status, TradeStatus::from_api_str)?;

        let expiration_date = self.optional_date(DraftField::ExpirationDate)?;
        if expiration_date.is_none() && policy.require_expiration_date {
            return Err(DraftError::MissingField(DraftField::ExpirationDate));
        }

        let date_closed = self.optional_date(DraftField::DateClosed)?;
        match (status, date_closed) {
            (TradeStatus::Closed, None) if policy.require_date_closed_when_closed => {
                return Err(DraftError::MissingField(DraftField::DateClosed));
            }
            (TradeStatus::Closed, _) | (_, None) => {}
            (_, Some(_)) => return Err(DraftError::DateClosedWhileNotClosed),
        }

        Ok(NewTrade {
            symbol,
            option_type,
            strike_price,
            expiration_date,
            premium,
            contracts,
            action,
            status,
            fees,
            date_closed,
        })
    }

    fn optional(&self, field: DraftField) -> Option<&str> {
        let value = self.get(field).trim();
        (!value.is_empty()).then_some(value)
    }

    fn required(&self, field: DraftField) -> Result<&str, DraftError> {
        self.optional(field).ok_or(DraftError::MissingField(field))
    }

    fn choice<T>(&self, field: DraftField, parse: fn(&str) -> Option<T>) -> Result<T, DraftError> {
        let raw = self.required(field)?;
        parse(raw).ok_or_else(|| DraftError::InvalidChoice {
            field,
            value: raw.to_string(),
        })
    }

    fn optional_date(&self, field: DraftField) -> Result<Option<NaiveDate>, DraftError> {
        self.optional(field)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DraftError::InvalidDate {
                    field,
                    value: raw.to_string(),
                })
            })
            .transpose()
    }
}

fn parse_decimal(field: DraftField, raw: &str) -> Result<Decimal, DraftError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| DraftError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Decimal no larger in magnitude than `MAX_AMOUNT`.
fn parse_amount(field: DraftField, raw: &str) -> Result<Decimal, DraftError> {
    let value = parse_decimal(field, raw)?;
    if value.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(DraftError::OutOfRange {
            field,
            reason: "must not exceed 1000000000",
        });
    }
    Ok(value)
}

/// Accept JSON strings, numbers or null for any draft field.
fn raw_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
