//! Command handlers for the spendlens CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod accounts;
mod analysis;
mod init;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, error};

pub use accounts::{accounts, AccountsReport};
pub use analysis::analysis;
pub use init::init;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data that can be printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message, or a rendered report, that can be printed to the user.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        println!("{}", self.message);
        if let Some(json) = self.json() {
            debug!("Command output:\n\n{json}\n\n");
        }
    }

    /// Print the structured data as pretty JSON to stdout. Falls back to the message when there
    /// is no structure.
    pub fn print_json(&self) {
        match self.json() {
            Some(json) => println!("{json}"),
            None => println!("{}", self.message),
        }
    }

    fn json(&self) -> Option<String> {
        let structure = self.structure()?;
        match serde_json::to_string_pretty(structure) {
            Ok(json) => Some(json),
            Err(e) => {
                error!("Unable to serialize the command output: {e}");
                None
            }
        }
    }
}

/// Renders rows as a plain-text table. The first column is left-aligned and the rest are
/// right-aligned, each as wide as its widest cell.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(ix, header)| {
            rows.iter()
                .filter_map(|row| row.get(ix))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(ix, (cell, &width))| {
                if ix == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = line(headers.to_vec());
    output.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        output.push('\n');
        output.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    output
}
