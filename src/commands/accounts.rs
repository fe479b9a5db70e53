use crate::api::{backend, Mode};
use crate::commands::{render_table, Out};
use crate::engine::{AccountAggregates, AccountSummary, Skipped};
use crate::model::Money;
use crate::{Config, Result};
use serde::Serialize;
use tracing::{info, warn};

/// The structured output of `spendlens accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountsReport {
    pub accounts: Vec<AccountSummary>,
    pub skipped: Skipped,
}

/// Fetches income, expense and transfers, then rolls them up per account.
///
/// # Errors
/// - Returns an error if any of the three collections cannot be fetched or read. Nothing is
///   computed from a partial ledger.
pub async fn accounts(config: &Config, mode: Mode) -> Result<Out<AccountsReport>> {
    let ledger = backend(config, mode)?.ledger().await?;
    info!(
        "Read {} income, {} expense and {} transfer records",
        ledger.income.len(),
        ledger.expense.len(),
        ledger.transfers.len()
    );

    let aggregates = AccountAggregates::new(&ledger.income, &ledger.expense, &ledger.transfers);
    let report = AccountsReport {
        accounts: aggregates.summaries(),
        skipped: aggregates.skipped(),
    };
    warn_skipped(&report.skipped);

    let message = render(&report.accounts, config.currency_symbol());
    Ok(Out::new(message, report))
}

fn render(accounts: &[AccountSummary], symbol: &str) -> String {
    if accounts.is_empty() {
        return "No account data found.".to_string();
    }
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                a.account_type.to_uppercase(),
                Money::new(a.total_income, symbol).to_string(),
                Money::new(-a.total_expense, symbol).to_string(),
                Money::new(a.debited, symbol).to_string(),
                Money::new(a.credited, symbol).to_string(),
                Money::new(a.balance, symbol).to_string(),
            ]
        })
        .collect();
    render_table(
        &[
            "Account", "Income", "Expense", "Debited", "Credited", "Balance",
        ],
        &rows,
    )
}

pub(super) fn warn_skipped(skipped: &Skipped) {
    if skipped.missing_keys > 0 {
        warn!(
            "Left out {} records with no usable account or category",
            skipped.missing_keys
        );
    }
    if skipped.malformed_amounts > 0 {
        warn!(
            "Counted {} records with a non-numeric amount as zero",
            skipped.malformed_amounts
        );
    }
    if skipped.overflowed_sums > 0 {
        warn!(
            "{} sums exceeded the largest representable amount and were capped",
            skipped.overflowed_sums
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_accounts_from_seed_data() {
        let env = TestEnv::new().await;
        let out = accounts(&env.config(), Mode::Test).await.unwrap();
        let report = out.structure().unwrap();
        assert!(report.skipped.is_empty());

        let keys: Vec<&str> = report
            .accounts
            .iter()
            .map(|a| a.account_type.as_str())
            .collect();
        assert_eq!(keys, vec!["bank", "cash", "credit card", "upi"]);

        let bank = &report.accounts[0];
        assert_eq!(bank.total_income, dec("170412.35"));
        assert_eq!(bank.total_expense, dec("23320.75"));
        assert_eq!(bank.debited, dec("26000"));
        assert_eq!(bank.credited, Decimal::ZERO);
        assert_eq!(bank.balance, dec("147091.60"));

        let card = &report.accounts[2];
        assert_eq!(card.credited, dec("18000"));
        assert_eq!(card.balance, dec("-5337.43"));

        let lines: Vec<&str> = out.message().lines().collect();
        assert!(lines[0].starts_with("Account"));
        assert!(lines[2].starts_with("BANK"));
        assert!(lines[2].contains("₹147,091.60"));
        assert!(lines[4].starts_with("CREDIT CARD"));
        assert!(lines[4].ends_with("-₹5,337.43"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], "₹"), "No account data found.");
    }
}
