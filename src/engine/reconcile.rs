//! Per-account rollups of income, expense and transfers.

use crate::engine::aggregate::{aggregate, Aggregate, Skipped};
use crate::engine::normalize::GroupKey;
use crate::model::{MoneyRecord, TransferRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// One account's totals.
///
/// `balance` is `total_income - total_expense`. Transfers are reported in `debited` and
/// `credited` but do not move `balance`; whether they should is an open product decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub account_type: GroupKey,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Transferred out of this account.
    pub debited: Decimal,
    /// Transferred into this account.
    pub credited: Decimal,
    pub balance: Decimal,
}

/// The four per-account aggregates `reconcile` combines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountAggregates {
    pub income: Aggregate,
    pub expense: Aggregate,
    pub debits: Aggregate,
    pub credits: Aggregate,
}

impl AccountAggregates {
    /// Aggregates income and expense by their account key, and transfers by `from` (debits) and
    /// `to` (credits).
    pub fn new(
        income: &[MoneyRecord],
        expense: &[MoneyRecord],
        transfers: &[TransferRecord],
    ) -> Self {
        Self {
            income: aggregate(income.iter().map(|r| (r.key.as_deref(), &r.amount))),
            expense: aggregate(expense.iter().map(|r| (r.key.as_deref(), &r.amount))),
            debits: aggregate(transfers.iter().map(|t| (t.from.as_deref(), &t.amount))),
            credits: aggregate(transfers.iter().map(|t| (t.to.as_deref(), &t.amount))),
        }
    }

    /// Everything skipped across the four aggregates. A transfer with a malformed amount is
    /// counted once per side.
    pub fn skipped(&self) -> Skipped {
        let mut skipped = self.income.skipped();
        skipped += self.expense.skipped();
        skipped += self.debits.skipped();
        skipped += self.credits.skipped();
        skipped
    }

    /// One summary per key found in any of the aggregates, sorted by key.
    pub fn summaries(&self) -> Vec<AccountSummary> {
        let keys: BTreeSet<&GroupKey> = self
            .income
            .keys()
            .chain(self.expense.keys())
            .chain(self.debits.keys())
            .chain(self.credits.keys())
            .collect();

        keys.into_iter()
            .map(|key| {
                let total_income = self.income.amount_or_zero(key);
                let total_expense = self.expense.amount_or_zero(key);
                AccountSummary {
                    account_type: key.clone(),
                    total_income,
                    total_expense,
                    debited: self.debits.amount_or_zero(key),
                    credited: self.credits.amount_or_zero(key),
                    balance: total_income.saturating_sub(total_expense),
                }
            })
            .collect()
    }
}

/// Combines the three record streams into one `AccountSummary` per account, sorted by account
/// key.
pub fn reconcile(
    income: &[MoneyRecord],
    expense: &[MoneyRecord],
    transfers: &[TransferRecord],
) -> Vec<AccountSummary> {
    let aggregates = AccountAggregates::new(income, expense, transfers);
    let summaries = aggregates.summaries();
    debug!(
        "Reconciled {} accounts from {} income, {} expense and {} transfer records",
        summaries.len(),
        income.len(),
        expense.len(),
        transfers.len()
    );
    summaries
}
