//! Splitting records into a current period and the comparable previous period.
//!
//! All instants are local wall-clock times. The reference instant is always passed in; nothing
//! here reads the clock.

use crate::model::Dated;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The size of the comparison window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// The reference calendar day against the day before.
    Daily,
    /// The seven days before the reference instant against the seven days before that.
    #[default]
    Weekly,
    /// The reference month-of-year against the month-of-year before it. The year is ignored.
    Monthly,
    /// The reference calendar year, with no comparison.
    Yearly,
}

serde_plain::derive_display_from_serialize!(WindowKind);
serde_plain::derive_fromstr_from_deserialize!(WindowKind);

/// A set of instants that a record date can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Period {
    /// One local calendar day.
    Day { date: NaiveDate },
    /// The half-open interval `[from, to)`.
    Span {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    /// A month of the year (1 to 12) in any year.
    MonthOfYear { month: u32 },
    /// One calendar year.
    Year { year: i32 },
}

impl Period {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        match *self {
            Period::Day { date } => at.date() == date,
            Period::Span { from, to } => from <= at && at < to,
            Period::MonthOfYear { month } => at.month() == month,
            Period::Year { year } => at.year() == year,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day { date } => write!(f, "{}", date.format("%a %d %b %Y")),
            Period::Span { from, to } => write!(
                f,
                "{} to {}",
                from.format("%d %b %Y %H:%M"),
                to.format("%d %b %Y %H:%M")
            ),
            Period::MonthOfYear { month } => {
                let name = NaiveDate::from_ymd_opt(2000, *month, 1)
                    .map(|d| d.format("%B").to_string())
                    .unwrap_or_else(|| format!("month {month}"));
                write!(f, "{name} (any year)")
            }
            Period::Year { year } => write!(f, "{year}"),
        }
    }
}

/// The current period and, except for yearly windows, the previous period to compare it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub kind: WindowKind,
    pub current: Period,
    pub previous: Option<Period>,
}

impl Window {
    pub fn new(kind: WindowKind, reference: NaiveDateTime) -> Self {
        let (current, previous) = match kind {
            WindowKind::Daily => (
                Period::Day {
                    date: reference.date(),
                },
                Some(Period::Day {
                    date: days_before(reference, 1).date(),
                }),
            ),
            WindowKind::Weekly => {
                let week_ago = days_before(reference, 7);
                (
                    Period::Span {
                        from: week_ago,
                        to: reference,
                    },
                    Some(Period::Span {
                        from: days_before(reference, 14),
                        to: week_ago,
                    }),
                )
            }
            WindowKind::Monthly => {
                let month = reference.month();
                let previous_month = if month == 1 { 12 } else { month - 1 };
                (
                    Period::MonthOfYear { month },
                    Some(Period::MonthOfYear {
                        month: previous_month,
                    }),
                )
            }
            WindowKind::Yearly => (
                Period::Year {
                    year: reference.year(),
                },
                None,
            ),
        };
        Self {
            kind,
            current,
            previous,
        }
    }
}

/// Calendar-day subtraction on the wall clock, so a week is seven local days even across a
/// daylight saving change. Clamps at the earliest representable instant.
fn days_before(reference: NaiveDateTime, days: u64) -> NaiveDateTime {
    reference
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Records split by a `Window`. `previous` is `None` when the window has no previous period,
/// which is different from a previous period that contains no records.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a, R> {
    pub window: Window,
    pub current: Vec<&'a R>,
    pub previous: Option<Vec<&'a R>>,
}

/// Splits `records` into the current and previous periods of the `kind` window around
/// `reference`. Records without a date belong to neither. Input order is preserved.
pub fn partition<R: Dated>(
    records: &[R],
    reference: NaiveDateTime,
    kind: WindowKind,
) -> Partition<'_, R> {
    let window = Window::new(kind, reference);
    let select = |period: Period| {
        records
            .iter()
            .filter(|r| r.date().is_some_and(|at| period.contains(at)))
            .collect::<Vec<_>>()
    };
    Partition {
        window,
        current: select(window.current),
        previous: window.previous.map(select),
    }
}
