//! These structs provide the CLI interface for the spendlens CLI.

use crate::engine::WindowKind;
use crate::model::{parse_timestamp, Flow};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendlens: account balances and spending breakdowns from your finance tracker.
///
/// The purpose of this program is to read the income, expense and transfer records kept by a
/// personal finance tracker backend and summarize them: what each account holds, and where the
/// money came from or went during the last day, week, month or year.
///
/// Run `spendlens init --backend-url <URL>` once to tell the program where the backend lives.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you want to keep the
    /// configuration in and pass it as --spendlens-home (by default it is $HOME/spendlens), then
    /// pass the base URL of your tracker backend as --backend-url.
    Init(InitArgs),
    /// Show income, expense, transfers and balance for each account.
    Accounts(AccountsArgs),
    /// Show totals and the category breakdown of income or expense for a time window.
    Analysis(AnalysisArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the spendlens configuration is held. Defaults to ~/spendlens
    #[arg(long, env = "SPENDLENS_HOME", default_value_t = default_spendlens_home())]
    spendlens_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, spendlens_home: PathBuf) -> Self {
        Self {
            log_level,
            spendlens_home: spendlens_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn spendlens_home(&self) -> &DisplayPath {
        &self.spendlens_home
    }
}

/// Args for the `spendlens init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the tracker backend, e.g. http://localhost:5000. The collections are read
    /// from api/income, api/expense and api/transaction below it.
    #[arg(long)]
    backend_url: String,
}

impl InitArgs {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }
}

/// Args for the `spendlens accounts` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AccountsArgs {
    /// Print the account summaries as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl AccountsArgs {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Args for the `spendlens analysis` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AnalysisArgs {
    /// Which records to break down by category.
    #[arg(long = "type", value_enum, default_value_t = Flow::Income)]
    flow: Flow,

    /// The comparison window.
    #[arg(long, value_enum, default_value_t = WindowKind::Weekly)]
    window: WindowKind,

    /// The reference instant, e.g. 2025-10-20T18:00, or 2025-10-20 for local midnight. Defaults
    /// to now.
    #[arg(long, value_parser = parse_reference)]
    at: Option<NaiveDateTime>,

    /// Print the analysis as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl AnalysisArgs {
    pub fn new(flow: Flow, window: WindowKind, at: Option<NaiveDateTime>, json: bool) -> Self {
        Self {
            flow,
            window,
            at,
            json,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn window(&self) -> WindowKind {
        self.window
    }

    /// The `--at` value, if one was given.
    pub fn at(&self) -> Option<NaiveDateTime> {
        self.at
    }

    /// The `--at` value, or the current local wall-clock time.
    pub fn reference(&self) -> NaiveDateTime {
        self.at.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn parse_reference(s: &str) -> Result<NaiveDateTime, String> {
    // A date typed on the command line means the start of that local day.
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    parse_timestamp(s, &Local).ok_or_else(|| {
        format!("'{s}' is not a date or date-time, expected e.g. 2025-10-20T18:00 or 2025-10-20")
    })
}

fn default_spendlens_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendlens"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --spendlens-home or SPENDLENS_HOME instead of relying on the \
                default spendlens home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("spendlens")
        }
    })
}

/// A `PathBuf` that implements `Display` so that clap can show it as a default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spendlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_analysis_defaults() {
        let args = parse(&["--spendlens-home", "/tmp/x", "analysis"]);
        let Command::Analysis(analysis) = args.command() else {
            panic!("expected the analysis command");
        };
        assert_eq!(analysis.flow(), Flow::Income);
        assert_eq!(analysis.window(), WindowKind::Weekly);
        assert_eq!(analysis.at(), None);
        assert!(!analysis.json());
        assert_eq!(args.common().spendlens_home().path(), Path::new("/tmp/x"));
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_analysis_flags() {
        let args = parse(&[
            "--log-level",
            "debug",
            "analysis",
            "--type",
            "expense",
            "--window",
            "monthly",
            "--at",
            "2025-10-20T18:30",
            "--json",
        ]);
        let Command::Analysis(analysis) = args.command() else {
            panic!("expected the analysis command");
        };
        assert_eq!(analysis.flow(), Flow::Expense);
        assert_eq!(analysis.window(), WindowKind::Monthly);
        let expected = NaiveDate::from_ymd_opt(2025, 10, 20)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(analysis.at(), Some(expected));
        assert_eq!(analysis.reference(), expected);
        assert!(analysis.json());
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_bare_date_reference_is_local_midnight() {
        let args = parse(&["analysis", "--at", "2025-10-20"]);
        let Command::Analysis(analysis) = args.command() else {
            panic!("expected the analysis command");
        };
        let expected = NaiveDate::from_ymd_opt(2025, 10, 20)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(analysis.at(), Some(expected));
    }

    #[test]
    fn test_bad_reference_is_rejected() {
        let result = Args::try_parse_from(["spendlens", "analysis", "--at", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_requires_backend_url() {
        assert!(Args::try_parse_from(["spendlens", "init"]).is_err());
        let args = parse(&["init", "--backend-url", "http://localhost:5000"]);
        let Command::Init(init) = args.command() else {
            panic!("expected the init command");
        };
        assert_eq!(init.backend_url(), "http://localhost:5000");
    }
}
