//! Types that represent the records read from the tracker backend.
mod amount;
mod record;

pub use amount::{round2, Money, RawAmount};
pub use record::{
    ingest, ingest_str, parse_timestamp, Dated, KeyField, MoneyRecord, Record, Shape,
    TransferRecord,
};
use serde::{Deserialize, Serialize};

/// Which side of the books a money record belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    #[default]
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(Flow);
serde_plain::derive_fromstr_from_deserialize!(Flow);

/// The three record streams the account view is computed from, fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub income: Vec<MoneyRecord>,
    pub expense: Vec<MoneyRecord>,
    pub transfers: Vec<TransferRecord>,
}
