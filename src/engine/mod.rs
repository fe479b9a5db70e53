//! The aggregation engine: pure functions from fully materialized record lists to account
//! summaries and category breakdowns. Nothing in here performs I/O, reads the clock, or keeps
//! state between calls.

mod aggregate;
mod breakdown;
mod normalize;
mod rank;
mod reconcile;
mod totals;
mod window;

pub use aggregate::{aggregate, Aggregate, Skipped};
pub use breakdown::{analysis, breakdown, Analysis, CategoryBreakdown};
pub use normalize::{normalize, GroupKey};
pub use rank::{hsl_for, rank, CategorySlice};
pub use reconcile::{reconcile, AccountAggregates, AccountSummary};
pub use totals::{totals, Totals};
pub use window::{partition, Partition, Period, Window, WindowKind};
