//! Unwindowed income and expense totals.

use crate::model::MoneyRecord;
use rust_decimal::Decimal;
use serde::Serialize;

/// Plain sums over the full income and expense lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    /// `income_total - expense_total`
    pub balance: Decimal,
}

/// Sums every record regardless of its key. Malformed amounts count as zero. Sums that leave the
/// range of `Decimal` stay at its limit.
pub fn totals(income: &[MoneyRecord], expense: &[MoneyRecord]) -> Totals {
    let income_total = sum(income);
    let expense_total = sum(expense);
    Totals {
        income_total,
        expense_total,
        balance: income_total.saturating_sub(expense_total),
    }
}

fn sum(records: &[MoneyRecord]) -> Decimal {
    records
        .iter()
        .map(|r| r.amount.coerce().unwrap_or(Decimal::ZERO))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawAmount;

    #[test]
    fn test_totals_empty() {
        assert_eq!(
            totals(&[], &[]),
            Totals {
                income_total: Decimal::ZERO,
                expense_total: Decimal::ZERO,
                balance: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn test_totals_include_keyless_records() {
        let income = vec![
            MoneyRecord::new("Salary", 1000, None),
            MoneyRecord {
                key: None,
                amount: RawAmount::from(50),
                date: None,
            },
        ];
        let expense = vec![
            MoneyRecord::new("Food", 300, None),
            MoneyRecord::new("Food", RawAmount::Malformed("n/a".to_string()), None),
        ];
        let t = totals(&income, &expense);
        assert_eq!(t.income_total, Decimal::from(1050));
        assert_eq!(t.expense_total, Decimal::from(300));
        assert_eq!(t.balance, Decimal::from(750));
    }

    #[test]
    fn test_totals_negative_balance() {
        let t = totals(&[], &[MoneyRecord::new("rent", 10, None)]);
        assert_eq!(t.balance, Decimal::from(-10));
    }

    #[test]
    fn test_totals_saturate_on_overflow() {
        let big = "50000000000000000000000000000".parse::<Decimal>().unwrap();
        let income = vec![
            MoneyRecord::new("bank", big, None),
            MoneyRecord::new("bank", big, None),
        ];
        let expense = vec![
            MoneyRecord::new("card", -big, None),
            MoneyRecord::new("card", -big, None),
        ];
        let t = totals(&income, &expense);
        assert_eq!(t.income_total, Decimal::MAX);
        assert_eq!(t.expense_total, Decimal::MIN);
        assert_eq!(t.balance, Decimal::MAX);
    }
}
