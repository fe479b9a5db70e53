//! Reading record collections from the tracker backend.
//!
//! The `Source` trait is the only thing that touches the network. `Backend` sits on top of it,
//! issues the requests a view needs concurrently, and turns the bodies into typed records. The
//! engine is only ever called with what `Backend` returns, so a failed request means the engine
//! does not run at all.

mod http;
mod test_source;

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{ingest_str, KeyField, Ledger, MoneyRecord, Record, Shape, TransferRecord};
use crate::{Config, Result};
use chrono::Local;
use std::fmt::{Display, Formatter};
use tracing::debug;

pub(crate) use http::HttpSource;
pub(crate) use test_source::TestSource;

/// When this environment variable is set to a non-empty value, the program reads seeded in-memory
/// data instead of calling the backend.
pub const TEST_MODE_ENV: &str = "SPENDLENS_IN_TEST_MODE";

/// A record collection exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Collection {
    Income,
    Expense,
    Transaction,
}

impl Collection {
    /// The path of the collection relative to the backend base URL.
    pub(crate) fn path(&self) -> &'static str {
        match self {
            Collection::Income => "api/income",
            Collection::Expense => "api/expense",
            Collection::Transaction => "api/transaction",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Fetches the raw body of a collection.
#[async_trait::async_trait]
pub(crate) trait Source: Send + Sync {
    async fn get(&self, collection: Collection) -> Res<String>;
}

/// Whether to talk to the real backend or to use seeded in-memory data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// `Mode::Test` when `SPENDLENS_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the `Source` for `mode`.
pub(crate) fn source(config: &Config, mode: Mode) -> Result<Box<dyn Source>> {
    Ok(match mode {
        Mode::Http => Box::new(HttpSource::new(config).pub_result(ErrorType::Config)?),
        Mode::Test => Box::new(TestSource::default()),
    })
}

/// Reads and ingests the collections each view needs.
pub(crate) struct Backend {
    source: Box<dyn Source>,
}

impl Backend {
    pub(crate) fn new(source: Box<dyn Source>) -> Self {
        Self { source }
    }

    /// Income and expense keyed by account type, plus all transfers. The three requests run
    /// concurrently and all must succeed.
    pub(crate) async fn ledger(&self) -> Result<Ledger> {
        let (income, expense, transfers) = tokio::try_join!(
            self.fetch(Collection::Income, Shape::Money(KeyField::AccountType)),
            self.fetch(Collection::Expense, Shape::Money(KeyField::AccountType)),
            self.fetch(Collection::Transaction, Shape::Transfer),
        )?;
        Ok(Ledger {
            income: money(income),
            expense: money(expense),
            transfers: transfers
                .into_iter()
                .filter_map(Record::into_transfer)
                .collect(),
        })
    }

    /// Income and expense keyed by category.
    pub(crate) async fn flows(&self) -> Result<(Vec<MoneyRecord>, Vec<MoneyRecord>)> {
        let (income, expense) = tokio::try_join!(
            self.fetch(Collection::Income, Shape::Money(KeyField::Category)),
            self.fetch(Collection::Expense, Shape::Money(KeyField::Category)),
        )?;
        Ok((money(income), money(expense)))
    }

    async fn fetch(&self, collection: Collection, shape: Shape) -> Result<Vec<Record>> {
        let body = self
            .source
            .get(collection)
            .await
            .pub_result(ErrorType::Fetch)?;
        debug!("Received {} bytes from {collection}", body.len());
        ingest_str(&body, shape, &Local)
            .map_err(|e| e.context(format!("Unable to read the records from {collection}")))
            .pub_result(ErrorType::Ingest)
    }
}

fn money(records: Vec<Record>) -> Vec<MoneyRecord> {
    records.into_iter().filter_map(Record::into_money).collect()
}

/// Shorthand for `Backend::new(source(config, mode)?)`.
pub(crate) fn backend(config: &Config, mode: Mode) -> Result<Backend> {
    Ok(Backend::new(source(config, mode)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reconcile;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_ledger_from_seed_data() {
        let backend = Backend::new(Box::new(TestSource::default()));
        let ledger = backend.ledger().await.unwrap();
        assert!(!ledger.income.is_empty());
        assert!(!ledger.expense.is_empty());
        assert!(!ledger.transfers.is_empty());
        assert!(ledger.income.iter().all(|r| r.key.is_some()));
        assert!(!reconcile(&ledger.income, &ledger.expense, &ledger.transfers).is_empty());
    }

    #[tokio::test]
    async fn test_flows_are_keyed_by_category() {
        let mut data = HashMap::new();
        data.insert(
            Collection::Income,
            r#"[{"accountType": "Bank", "category": "Salary", "amount": 10}]"#.to_string(),
        );
        data.insert(Collection::Expense, "[]".to_string());
        let backend = Backend::new(Box::new(TestSource::new(data)));
        let (income, expense) = backend.flows().await.unwrap();
        assert_eq!(income[0].key.as_deref(), Some("Salary"));
        assert!(expense.is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_fetch_fails_the_whole_ledger() {
        let mut data = HashMap::new();
        data.insert(Collection::Income, "[]".to_string());
        data.insert(Collection::Expense, "[]".to_string());
        let backend = Backend::new(Box::new(TestSource::new(data)));
        let err = backend.ledger().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Fetch);
        assert!(err.to_string().contains("api/transaction"));
    }

    #[tokio::test]
    async fn test_bad_body_is_an_ingest_error() {
        let mut data = HashMap::new();
        data.insert(Collection::Income, r#"{"message": "oops"}"#.to_string());
        data.insert(Collection::Expense, "[]".to_string());
        let backend = Backend::new(Box::new(TestSource::new(data)));
        let err = backend.flows().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Ingest);
        assert!(err.to_string().contains("api/income"));
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::Income.path(), "api/income");
        assert_eq!(Collection::Expense.to_string(), "api/expense");
        assert_eq!(Collection::Transaction.path(), "api/transaction");
    }
}
