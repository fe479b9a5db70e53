//! Typed records and the ingestion boundary that builds them from backend JSON.

use crate::error::Res;
use crate::model::RawAmount;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Anything that may carry a local timestamp.
pub trait Dated {
    fn date(&self) -> Option<NaiveDateTime>;
}

/// One income or expense entry. `key` is the account type or the category name, depending on
/// which field the record was ingested with (see `KeyField`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoneyRecord {
    pub key: Option<String>,
    pub amount: RawAmount,
    pub date: Option<NaiveDateTime>,
}

impl MoneyRecord {
    pub fn new(
        key: impl Into<String>,
        amount: impl Into<RawAmount>,
        date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            amount: amount.into(),
            date,
        }
    }
}

impl Dated for MoneyRecord {
    fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }
}

/// A movement of money between two accounts. `from` and `to` are not required to differ.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferRecord {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: RawAmount,
    pub date: Option<NaiveDateTime>,
}

impl TransferRecord {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<RawAmount>,
        date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            amount: amount.into(),
            date,
        }
    }
}

impl Dated for TransferRecord {
    fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }
}

/// A record of either kind, as produced by `ingest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Money(MoneyRecord),
    Transfer(TransferRecord),
}

impl Record {
    pub fn into_money(self) -> Option<MoneyRecord> {
        match self {
            Record::Money(m) => Some(m),
            Record::Transfer(_) => None,
        }
    }

    pub fn into_transfer(self) -> Option<TransferRecord> {
        match self {
            Record::Transfer(t) => Some(t),
            Record::Money(_) => None,
        }
    }
}

impl Dated for Record {
    fn date(&self) -> Option<NaiveDateTime> {
        match self {
            Record::Money(m) => m.date,
            Record::Transfer(t) => t.date,
        }
    }
}

/// Which JSON field supplies the grouping key of a money record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyField {
    /// Group by the account the money went in or out of.
    #[serde(rename = "accountType")]
    AccountType,
    /// Group by the category of the entry.
    #[serde(rename = "category")]
    Category,
}

serde_plain::derive_display_from_serialize!(KeyField);

/// The expected shape of each element of a backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Money(KeyField),
    Transfer,
}

/// Builds typed records from a backend response body, which must be a JSON array. Elements that
/// are not objects are skipped with a warning. Timestamps carrying an offset are converted into
/// `tz` before their calendar date is taken.
pub fn ingest<Tz: TimeZone>(body: Value, shape: Shape, tz: &Tz) -> Res<Vec<Record>> {
    let items = match body {
        Value::Array(items) => items,
        other => bail!(
            "Expected a JSON array of records but received {}",
            json_kind(&other)
        ),
    };

    let mut records = Vec::with_capacity(items.len());
    for (ix, item) in items.into_iter().enumerate() {
        let object = match item {
            Value::Object(object) => object,
            other => {
                warn!("Skipping element {ix}: expected an object, found {}", json_kind(&other));
                continue;
            }
        };
        let date = object.get("date").and_then(|v| parse_date_value(v, tz));
        let amount = object
            .get("amount")
            .map(RawAmount::from_json)
            .unwrap_or_default();
        let record = match shape {
            Shape::Money(field) => Record::Money(MoneyRecord {
                key: string_field(&object, &field.to_string()),
                amount,
                date,
            }),
            Shape::Transfer => Record::Transfer(TransferRecord {
                from: string_field(&object, "from"),
                to: string_field(&object, "to"),
                amount,
                date,
            }),
        };
        records.push(record);
    }
    debug!("Ingested {} records as {shape:?}", records.len());
    Ok(records)
}

/// Parses a response body and then ingests it.
pub fn ingest_str<Tz: TimeZone>(body: &str, shape: Shape, tz: &Tz) -> Res<Vec<Record>> {
    let value: Value = serde_json::from_str(body).context("Response body is not valid JSON")?;
    ingest(value, shape, tz)
}

fn string_field(object: &Map<String, Value>, name: &str) -> Option<String> {
    match object.get(name) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => {
            debug!("Ignoring non-string '{name}' value {other}");
            None
        }
    }
}

fn parse_date_value<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<NaiveDateTime> {
    let parsed = match value {
        Value::String(s) => parse_timestamp(s, tz),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|utc| utc.with_timezone(tz).naive_local()),
        _ => None,
    };
    if parsed.is_none() {
        debug!("Unusable date {value}, the record will not fall into any window");
    }
    parsed
}

/// Parses the timestamp formats the tracker's forms and backend emit, returning the local
/// wall-clock time in `tz`:
/// - RFC 3339 with an offset or `Z`, e.g. `2025-06-01T04:30:00.000Z`
/// - a local date-time, e.g. `2025-06-01T10:00` or `2025-06-01 10:00:30`
/// - a bare date, e.g. `2025-06-01`, read as UTC midnight the way the backend stores it
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz).naive_local());
    }
    const LOCAL_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in LOCAL_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ndt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| {
            Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))
                .with_timezone(tz)
                .naive_local()
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
