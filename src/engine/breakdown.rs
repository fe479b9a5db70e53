//! Windowed category breakdowns, the data behind the analysis view.

use crate::engine::aggregate::{aggregate, Skipped};
use crate::engine::rank::{rank, CategorySlice};
use crate::engine::totals::{totals, Totals};
use crate::engine::window::{partition, Window, WindowKind};
use crate::model::{Flow, MoneyRecord};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Category shares for the current window and, when the window kind has one, the previous window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub window: Window,
    pub current: Vec<CategorySlice>,
    /// `None` for yearly windows; `Some(vec![])` when the previous window had no records.
    pub previous: Option<Vec<CategorySlice>>,
    pub skipped: Skipped,
}

/// Partitions `records` (keyed by category) by window, then aggregates and ranks each side.
pub fn breakdown(
    records: &[MoneyRecord],
    reference: NaiveDateTime,
    kind: WindowKind,
) -> CategoryBreakdown {
    let split = partition(records, reference, kind);
    let current = aggregate(split.current.iter().map(|r| (r.key.as_deref(), &r.amount)));
    let previous = split
        .previous
        .as_ref()
        .map(|p| aggregate(p.iter().map(|r| (r.key.as_deref(), &r.amount))));

    let mut skipped = current.skipped();
    if let Some(previous) = &previous {
        skipped += previous.skipped();
    }

    CategoryBreakdown {
        window: split.window,
        current: rank(&current),
        previous: previous.as_ref().map(rank),
        skipped,
    }
}

/// Everything the analysis view shows: totals over all income and expense, and the windowed
/// breakdown of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub flow: Flow,
    pub totals: Totals,
    pub breakdown: CategoryBreakdown,
}

/// Builds the analysis view. `income` and `expense` must be keyed by category.
pub fn analysis(
    income: &[MoneyRecord],
    expense: &[MoneyRecord],
    flow: Flow,
    reference: NaiveDateTime,
    kind: WindowKind,
) -> Analysis {
    let records = match flow {
        Flow::Income => income,
        Flow::Expense => expense,
    };
    Analysis {
        flow,
        totals: totals(income, expense),
        breakdown: breakdown(records, reference, kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::window::Period;
    use rust_decimal::Decimal;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn rec(category: &str, amount: i64, date: &str) -> MoneyRecord {
        MoneyRecord::new(category, amount, Some(at(date)))
    }

    const NOW: &str = "2025-06-15 12:00:00";

    #[test]
    fn test_weekly_breakdown() {
        let records = vec![
            rec("Food", 30, "2025-06-14 09:00:00"),
            rec("food", 10, "2025-06-10 09:00:00"),
            rec("Fuel", 60, "2025-06-09 09:00:00"),
            rec("Food", 25, "2025-06-05 09:00:00"),
            rec("Rent", 999, "2025-01-01 09:00:00"),
        ];
        let b = breakdown(&records, at(NOW), WindowKind::Weekly);

        assert_eq!(b.current.len(), 2);
        assert_eq!(b.current[0].name.as_str(), "food");
        assert_eq!(b.current[0].value, Decimal::from(40));
        assert_eq!(b.current[0].percentage, "40.00");
        assert_eq!(b.current[1].name.as_str(), "fuel");
        assert_eq!(b.current[1].percentage, "60.00");

        let previous = b.previous.unwrap();
        assert_eq!(previous.len(), 1);
        assert_eq!(previous[0].name.as_str(), "food");
        assert_eq!(previous[0].percentage, "100.00");
        assert!(b.skipped.is_empty());
    }

    #[test]
    fn test_yearly_breakdown_has_no_previous() {
        let records = vec![rec("Salary", 1000, "2025-03-01 00:00:00")];
        let b = breakdown(&records, at(NOW), WindowKind::Yearly);
        assert_eq!(b.current.len(), 1);
        assert!(b.previous.is_none());
        assert_eq!(b.window.current, Period::Year { year: 2025 });
    }

    #[test]
    fn test_empty_previous_window_is_empty_not_absent() {
        let records = vec![rec("Salary", 1000, "2025-06-15 08:00:00")];
        let b = breakdown(&records, at(NOW), WindowKind::Daily);
        assert_eq!(b.previous, Some(vec![]));
    }

    #[test]
    fn test_breakdown_counts_skipped_on_both_sides() {
        let records = vec![
            MoneyRecord {
                key: Some("  ".to_string()),
                amount: 5.into(),
                date: Some(at("2025-06-15 08:00:00")),
            },
            MoneyRecord {
                key: None,
                amount: 5.into(),
                date: Some(at("2025-06-14 08:00:00")),
            },
        ];
        let b = breakdown(&records, at(NOW), WindowKind::Daily);
        assert!(b.current.is_empty());
        assert_eq!(b.skipped.missing_keys, 2);
    }

    #[test]
    fn test_analysis_uses_unwindowed_totals() {
        let income = vec![
            rec("Salary", 1000, "2025-06-14 09:00:00"),
            rec("Gift", 200, "2024-01-01 09:00:00"),
        ];
        let expense = vec![rec("Food", 150, "2025-06-15 09:00:00")];

        let a = analysis(&income, &expense, Flow::Expense, at(NOW), WindowKind::Daily);
        assert_eq!(a.totals.income_total, Decimal::from(1200));
        assert_eq!(a.totals.expense_total, Decimal::from(150));
        assert_eq!(a.totals.balance, Decimal::from(1050));
        assert_eq!(a.breakdown.current.len(), 1);
        assert_eq!(a.breakdown.current[0].name.as_str(), "food");

        let a = analysis(&income, &expense, Flow::Income, at(NOW), WindowKind::Yearly);
        assert_eq!(a.breakdown.current.len(), 1);
        assert_eq!(a.breakdown.current[0].name.as_str(), "salary");
    }

    #[test]
    fn test_analysis_empty_inputs() {
        let a = analysis(&[], &[], Flow::Income, at(NOW), WindowKind::Monthly);
        assert_eq!(a.totals, Totals::default());
        assert!(a.breakdown.current.is_empty());
        assert_eq!(a.breakdown.previous, Some(vec![]));
    }
}
