//! Summing amounts by grouping key.

use crate::engine::normalize::{normalize, GroupKey};
use crate::model::RawAmount;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::AddAssign;
use tracing::debug;

/// Counts of records that were recovered from rather than aggregated as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Skipped {
    /// Records whose amount was not a number and was counted as zero.
    pub malformed_amounts: usize,
    /// Records dropped because their key was absent or blank.
    pub missing_keys: usize,
    /// Additions that left the representable range and were held at its limit.
    pub overflowed_sums: usize,
}

impl Skipped {
    pub fn is_empty(&self) -> bool {
        self.malformed_amounts == 0 && self.missing_keys == 0 && self.overflowed_sums == 0
    }
}

impl AddAssign for Skipped {
    fn add_assign(&mut self, rhs: Self) {
        self.malformed_amounts += rhs.malformed_amounts;
        self.missing_keys += rhs.missing_keys;
        self.overflowed_sums += rhs.overflowed_sums;
    }
}

/// A mapping from `GroupKey` to a summed amount.
///
/// Iteration follows first-insertion order, so the output of a given input list is stable.
/// Equality compares the mappings only: two aggregates built from the same records in a different
/// order are equal.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    entries: Vec<(GroupKey, Decimal)>,
    index: HashMap<GroupKey, usize>,
    skipped: Skipped,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the running sum for `key`, inserting the key if it is new.
    ///
    /// A sum that would leave the range of `Decimal` stays at `Decimal::MAX` or `Decimal::MIN`
    /// and is tallied in `Skipped::overflowed_sums`.
    pub fn add(&mut self, key: GroupKey, amount: Decimal) {
        match self.index.get(&key) {
            Some(&ix) => {
                let sum = &mut self.entries[ix].1;
                *sum = match sum.checked_add(amount) {
                    Some(next) => next,
                    None => {
                        debug!("Sum for '{key}' overflowed, holding it at the limit");
                        self.skipped.overflowed_sums += 1;
                        sum.saturating_add(amount)
                    }
                };
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, amount)| *amount)
    }

    /// The sum for `key`, or zero when the key never appeared.
    pub fn amount_or_zero(&self, key: &GroupKey) -> Decimal {
        self.index
            .get(key)
            .map(|&ix| self.entries[ix].1)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, Decimal)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of all values, saturating at the limits of `Decimal`.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// What had to be recovered from while building this aggregate.
    pub fn skipped(&self) -> Skipped {
        self.skipped
    }
}

impl PartialEq for Aggregate {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.index.get(k).map(|&ix| other.entries[ix].1) == Some(v))
    }
}

impl Eq for Aggregate {}

impl FromIterator<(GroupKey, Decimal)> for Aggregate {
    fn from_iter<T: IntoIterator<Item = (GroupKey, Decimal)>>(iter: T) -> Self {
        let mut aggregate = Aggregate::new();
        for (key, amount) in iter {
            aggregate.add(key, amount);
        }
        aggregate
    }
}

/// Sums `(key, amount)` pairs by normalized key.
///
/// Records whose key normalizes to nothing are dropped. Amounts that are not numbers count as
/// zero, so one bad record never spoils the rest of the report. Both cases are tallied in
/// `Aggregate::skipped`.
pub fn aggregate<'a, I>(records: I) -> Aggregate
where
    I: IntoIterator<Item = (Option<&'a str>, &'a RawAmount)>,
{
    let mut result = Aggregate::new();
    for (raw_key, raw_amount) in records {
        let Some(key) = normalize(raw_key) else {
            result.skipped.missing_keys += 1;
            continue;
        };
        let amount = match raw_amount.coerce() {
            Some(amount) => amount,
            None => {
                debug!("Counting malformed amount {raw_amount:?} for '{key}' as zero");
                result.skipped.malformed_amounts += 1;
                Decimal::ZERO
            }
        };
        result.add(key, amount);
    }
    if !result.skipped.is_empty() {
        debug!(
            "Aggregated {} keys; {} malformed amounts, {} without a key, {} overflowed sums",
            result.len(),
            result.skipped.malformed_amounts,
            result.skipped.missing_keys,
            result.skipped.overflowed_sums
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn key(s: &str) -> GroupKey {
        normalize(Some(s)).unwrap()
    }

    fn pairs(data: &[(Option<&'static str>, RawAmount)]) -> Aggregate {
        aggregate(data.iter().map(|(k, a)| (*k, a)))
    }

    #[test]
    fn test_aggregate_sums_by_normalized_key() {
        let agg = pairs(&[
            (Some("Food"), RawAmount::from(30)),
            (Some(" food "), RawAmount::from(10)),
            (Some("Rent"), RawAmount::from(dec("500.25"))),
        ]);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.get("food"), Some(dec("40")));
        assert_eq!(agg.get("rent"), Some(dec("500.25")));
        assert_eq!(agg.total(), dec("540.25"));
        assert!(agg.skipped().is_empty());
    }

    #[test]
    fn test_aggregate_keeps_first_insertion_order() {
        let agg = pairs(&[
            (Some("b"), RawAmount::from(1)),
            (Some("a"), RawAmount::from(1)),
            (Some("B"), RawAmount::from(1)),
            (Some("c"), RawAmount::from(1)),
        ]);
        let keys: Vec<&str> = agg.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_aggregate_counts_malformed_amounts_as_zero() {
        let agg = pairs(&[
            (Some("cash"), RawAmount::from(100)),
            (Some("cash"), RawAmount::Malformed("abc".to_string())),
            (Some("bank"), RawAmount::Missing),
        ]);
        assert_eq!(agg.get("cash"), Some(dec("100")));
        assert_eq!(agg.get("bank"), Some(Decimal::ZERO));
        assert_eq!(
            agg.skipped(),
            Skipped {
                malformed_amounts: 2,
                missing_keys: 0,
                overflowed_sums: 0,
            }
        );
    }

    #[test]
    fn test_aggregate_drops_missing_keys() {
        let agg = pairs(&[
            (None, RawAmount::from(5)),
            (Some("   "), RawAmount::from(5)),
            (Some("cash"), RawAmount::from(5)),
        ]);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.total(), dec("5"));
        assert_eq!(agg.skipped().missing_keys, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate(std::iter::empty());
        assert!(agg.is_empty());
        assert_eq!(agg.total(), Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let data = vec![
            (Some("food"), RawAmount::from(dec("0.1"))),
            (Some("rent"), RawAmount::from(dec("1200"))),
            (Some("Food"), RawAmount::from(dec("0.2"))),
            (Some("fuel"), RawAmount::from(dec("33.33"))),
            (Some("rent"), RawAmount::from(dec("-0.01"))),
            (Some("FOOD"), RawAmount::from(dec("19.7"))),
        ];
        let forward = pairs(&data);
        let mut reversed = data.clone();
        reversed.reverse();
        let mut rotated = data.clone();
        rotated.rotate_left(2);

        assert_eq!(forward, pairs(&reversed));
        assert_eq!(forward, pairs(&rotated));
        assert_eq!(forward.get("food"), Some(dec("20.0")));
    }

    #[test]
    fn test_equality_ignores_order_but_not_values() {
        let a: Aggregate = [(key("x"), dec("1")), (key("y"), dec("2"))].into_iter().collect();
        let b: Aggregate = [(key("y"), dec("2")), (key("x"), dec("1"))].into_iter().collect();
        let c: Aggregate = [(key("y"), dec("2")), (key("x"), dec("1.5"))].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_aggregate_saturates_on_overflow() {
        let agg = pairs(&[
            (Some("bank"), RawAmount::from(dec("50000000000000000000000000000"))),
            (Some("Bank"), RawAmount::from(dec("50000000000000000000000000000"))),
            (Some("cash"), RawAmount::from(dec("-50000000000000000000000000000"))),
            (Some("cash"), RawAmount::from(dec("-50000000000000000000000000000"))),
        ]);
        assert_eq!(agg.get("bank"), Some(Decimal::MAX));
        assert_eq!(agg.get("cash"), Some(Decimal::MIN));
        assert_eq!(agg.skipped().overflowed_sums, 2);
        assert!(!agg.skipped().is_empty());
    }

    #[test]
    fn test_total_saturates_across_keys() {
        let big = dec("50000000000000000000000000000");
        let agg: Aggregate = [(key("a"), big), (key("b"), big)].into_iter().collect();
        assert_eq!(agg.total(), Decimal::MAX);
        assert!(agg.skipped().is_empty());
    }

    #[test]
    fn test_amount_or_zero() {
        let agg: Aggregate = [(key("x"), dec("3"))].into_iter().collect();
        assert_eq!(agg.amount_or_zero(&key("x")), dec("3"));
        assert_eq!(agg.amount_or_zero(&key("y")), Decimal::ZERO);
        assert!(agg.contains(&key("x")));
    }
}
