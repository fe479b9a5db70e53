//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a running backend (see `SPENDLENS_IN_TEST_MODE`).

use crate::api::{Collection, Source};
use crate::error::Res;
use anyhow::Context;
use std::collections::HashMap;

/// An implementation of the `Source` trait that does not use the network. It can hold any data in
/// memory and, by default, is seeded with some existing data.
pub(crate) struct TestSource {
    data: HashMap<Collection, String>,
}

impl TestSource {
    /// Create a new `TestSource` using `data`. The map value is the raw JSON body returned for the
    /// collection.
    pub(crate) fn new(data: HashMap<Collection, String>) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn get(&self, collection: Collection) -> Res<String> {
        self.data
            .get(&collection)
            .with_context(|| format!("Collection '{collection}' not found"))
            .cloned()
    }
}

impl Default for TestSource {
    /// Loads seed data from this module.
    fn default() -> Self {
        let mut data = HashMap::new();
        data.insert(Collection::Income, INCOME_DATA.to_string());
        data.insert(Collection::Expense, EXPENSE_DATA.to_string());
        data.insert(Collection::Transaction, TRANSACTION_DATA.to_string());
        Self::new(data)
    }
}

/// Seed income records.
const INCOME_DATA: &str = r#"[
  {"accountType": "Bank", "category": "Salary", "amount": 85000, "notes": "October salary", "date": "2025-10-01T09:00:00"},
  {"accountType": "bank", "category": "Interest", "amount": "412.35", "notes": "Savings interest", "date": "2025-10-05T00:00:00"},
  {"accountType": "Cash", "category": "Gifts", "amount": 2000, "notes": "Birthday", "date": "2025-10-12T18:30:00"},
  {"accountType": "UPI", "category": "Refunds", "amount": 649.5, "notes": "Returned headphones", "date": "2025-10-18T14:05:00"},
  {"accountType": "Bank", "category": "salary", "amount": 85000, "notes": "September salary", "date": "2025-09-01T09:00:00"}
]"#;

/// Seed expense records.
const EXPENSE_DATA: &str = r#"[
  {"accountType": "Credit Card", "category": "Groceries", "amount": 3487.43, "notes": "Weekly shop", "date": "2025-10-19T11:20:00"},
  {"accountType": "UPI", "category": "Food", "amount": 245, "notes": "Lunch", "date": "2025-10-18T13:10:00"},
  {"accountType": "cash", "category": "food", "amount": "120.00", "notes": "Tea and snacks", "date": "2025-10-17T17:45:00"},
  {"accountType": "Bank", "category": "Rent", "amount": 22000, "notes": "October rent", "date": "2025-10-03T10:00:00"},
  {"accountType": "Credit Card", "category": "Fuel", "amount": 1850, "notes": "Petrol", "date": "2025-10-09T08:15:00"},
  {"accountType": "UPI", "category": "Entertainment", "amount": 499, "notes": "Streaming", "date": "2025-10-11T20:00:00"},
  {"accountType": "Bank", "category": "Utilities", "amount": "1320.75", "notes": "Electricity", "date": "2025-09-28T09:30:00"},
  {"accountType": "Cash", "category": "Groceries", "amount": 760, "notes": "Vegetables", "date": "2025-09-20T07:50:00"}
]"#;

/// Seed transfer records.
const TRANSACTION_DATA: &str = r#"[
  {"from": "Bank", "to": "Cash", "amount": 5000, "notes": "ATM", "date": "2025-10-02T12:00:00"},
  {"from": "Bank", "to": "Credit Card", "amount": 18000, "notes": "Card bill", "date": "2025-10-15T09:00:00"},
  {"from": "Bank", "to": "UPI", "amount": 3000, "notes": "Wallet top-up", "date": "2025-10-16T19:40:00"}
]"#;
