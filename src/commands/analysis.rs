use crate::api::{backend, Mode};
use crate::commands::accounts::warn_skipped;
use crate::commands::{render_table, Out};
use crate::engine::{self, Analysis, CategorySlice, Period, WindowKind};
use crate::model::{Flow, Money};
use crate::{Config, Result};
use chrono::NaiveDateTime;
use std::fmt::Write;
use tracing::debug;

/// Fetches income and expense keyed by category, then computes the totals and the category
/// breakdown of `flow` for the window of `kind` around `reference`.
///
/// # Errors
/// - Returns an error if either collection cannot be fetched or read.
pub async fn analysis(
    config: &Config,
    mode: Mode,
    flow: Flow,
    kind: WindowKind,
    reference: NaiveDateTime,
) -> Result<Out<Analysis>> {
    let (income, expense) = backend(config, mode)?.flows().await?;
    debug!("Analyzing {flow} for the {kind} window at {reference}");

    let analysis = engine::analysis(&income, &expense, flow, reference, kind);
    warn_skipped(&analysis.breakdown.skipped);

    let message = render(&analysis, config.currency_symbol());
    Ok(Out::new(message, analysis))
}

fn render(analysis: &Analysis, symbol: &str) -> String {
    let totals = &analysis.totals;
    let mut output = render_table(
        &["Totals", ""],
        &[
            vec![
                "Income".to_string(),
                Money::new(totals.income_total, symbol).to_string(),
            ],
            vec![
                "Expense".to_string(),
                Money::new(-totals.expense_total, symbol).to_string(),
            ],
            vec![
                "Balance".to_string(),
                Money::new(totals.balance, symbol).to_string(),
            ],
        ],
    );

    let breakdown = &analysis.breakdown;
    let kind = breakdown.window.kind;
    let flow = analysis.flow;
    section(
        &mut output,
        &format!("Current {kind} {flow}"),
        &breakdown.window.current,
        &breakdown.current,
        symbol,
    );

    // An empty previous window is not shown at all.
    if let (Some(period), Some(previous)) = (&breakdown.window.previous, &breakdown.previous) {
        if !previous.is_empty() {
            section(
                &mut output,
                &format!("Previous {kind} {flow}"),
                period,
                previous,
                symbol,
            );
        }
    }
    output
}

fn section(
    output: &mut String,
    title: &str,
    period: &Period,
    slices: &[CategorySlice],
    symbol: &str,
) {
    let _ = write!(output, "\n\n{title} ({period})\n");
    if slices.is_empty() {
        output.push_str("Nothing recorded in this window.");
        return;
    }
    let rows: Vec<Vec<String>> = slices
        .iter()
        .map(|s| {
            vec![
                s.name.to_string(),
                Money::new(s.value, symbol).to_string(),
                format!("{}%", s.percentage),
                s.color(),
            ]
        })
        .collect();
    output.push_str(&render_table(&["Category", "Amount", "Share", "Color"], &rows));
}
