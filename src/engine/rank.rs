//! Turning an aggregate into percentage shares.

use crate::engine::aggregate::Aggregate;
use crate::engine::normalize::GroupKey;
use crate::model::round2;
use rust_decimal::Decimal;
use serde::Serialize;

/// One category's amount and share of its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub name: GroupKey,
    /// The amount rounded to two decimals.
    pub value: Decimal,
    /// Share of the window total, two decimals, `"0.00"` when the total is not positive.
    pub percentage: String,
    /// Input to `color`; the key itself, so a category keeps its color across renders.
    pub color_seed: GroupKey,
}

impl CategorySlice {
    /// A deterministic chart color for this slice, e.g. `hsl(212, 70%, 50%)`.
    pub fn color(&self) -> String {
        hsl_for(&self.color_seed)
    }
}

/// Hashes `seed` over its UTF-16 code units (`h = c + 31 * h`, wrapping at 32 bits) and maps the
/// hash onto a hue.
pub fn hsl_for(seed: &str) -> String {
    let hash = seed.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    let hue = i64::from(hash).abs() % 360;
    format!("hsl({hue}, 70%, 50%)")
}

/// Computes one `CategorySlice` per aggregate entry, in the aggregate's order.
pub fn rank(aggregate: &Aggregate) -> Vec<CategorySlice> {
    let total = aggregate.total();
    aggregate
        .iter()
        .map(|(key, amount)| {
            let percentage = share(amount, total);
            CategorySlice {
                name: key.clone(),
                value: round2(amount),
                percentage: format!("{percentage:.2}"),
                color_seed: key.clone(),
            }
        })
        .collect()
}

/// `amount` as a percentage of `total`, rounded to two decimals. Zero when `total` is not
/// positive, and held at the limits of `Decimal` when the ratio does not fit.
fn share(amount: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match amount.checked_div(total) {
        Some(ratio) => round2(ratio.saturating_mul(Decimal::ONE_HUNDRED)),
        None if amount.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}
