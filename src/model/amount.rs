//! Amounts as they arrive from the backend, and how they are rounded and printed.
//!
//! The backend stores amounts as whatever the entry form submitted, so a record can carry a JSON
//! number, a numeric string, or something that is not a number at all. `RawAmount` keeps that
//! distinction so the aggregation code can coerce malformed values to zero and count them.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// An amount exactly as the backend sent it.
///
/// # Examples
///
/// ```
/// # use spendlens::model::RawAmount;
/// # use rust_decimal::Decimal;
/// let a: RawAmount = serde_json::from_str("\" 12.50 \"").unwrap();
/// assert_eq!(a.coerce(), Some(Decimal::new(1250, 2)));
///
/// let b: RawAmount = serde_json::from_str("\"twelve\"").unwrap();
/// assert_eq!(b.coerce(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawAmount {
    /// A value that was understood as a number.
    Valid(Decimal),
    /// A value that was present but is not a number. The original text is kept for logging.
    Malformed(String),
    /// The field was absent or `null`.
    #[default]
    Missing,
}

impl RawAmount {
    /// Interprets a JSON value. Blank strings count as zero, the way an empty numeric form field
    /// does. A JSON number is always valid; one that `Decimal` cannot hold exactly becomes the
    /// nearest value it can.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawAmount::Missing,
            serde_json::Value::Number(n) => parse_decimal(&n.to_string())
                .or_else(|| n.as_f64().map(clamp_f64))
                .map(RawAmount::Valid)
                .unwrap_or_else(|| RawAmount::Malformed(n.to_string())),
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return RawAmount::Valid(Decimal::ZERO);
                }
                parse_decimal(trimmed)
                    .map(RawAmount::Valid)
                    .unwrap_or_else(|| RawAmount::Malformed(s.clone()))
            }
            other => RawAmount::Malformed(other.to_string()),
        }
    }

    /// The numeric value, or `None` when the amount is malformed or missing.
    pub fn coerce(&self) -> Option<Decimal> {
        match self {
            RawAmount::Valid(d) => Some(*d),
            _ => None,
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn clamp_f64(value: f64) -> Decimal {
    match Decimal::from_f64(value) {
        Some(d) => d,
        None if value.abs() < 1.0 => Decimal::ZERO,
        None if value.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        RawAmount::Valid(value)
    }
}

impl From<i32> for RawAmount {
    fn from(value: i32) -> Self {
        RawAmount::Valid(Decimal::from(value))
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Valid(Decimal::from(value))
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(RawAmount::from_json(&value))
    }
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Displays a value with a currency symbol, thousands separators and two decimals, e.g.
/// `-₹1,234.50`.
#[derive(Debug, Clone, Copy)]
pub struct Money<'a> {
    value: Decimal,
    symbol: &'a str,
}

impl<'a> Money<'a> {
    pub fn new(value: Decimal, symbol: &'a str) -> Self {
        Self { value, symbol }
    }
}

impl fmt::Display for Money<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = round2(self.value);
        let sign = if value.is_sign_negative() && !value.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{sign}{}{}",
            self.symbol,
            format_num::format_num!(",.2", value.abs().to_f64().unwrap_or_default())
        )
    }
}
