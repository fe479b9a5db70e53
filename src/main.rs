use clap::Parser;
use serde::Serialize;
use spendlens::args::{Args, Command};
use spendlens::commands::Out;
use spendlens::{commands, Config, Mode, Result};
use std::fmt::Debug;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().spendlens_home().path();

    // This allows for running the program without a backend. When SPENDLENS_IN_TEST_MODE is set
    // and non-zero in length, then the mode will be Mode::Test, otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.backend_url())
            .await?
            .print(),

        Command::Accounts(accounts_args) => {
            let config = Config::load(home).await?;
            let out = commands::accounts(&config, mode).await?;
            print(&out, accounts_args.json());
        }

        Command::Analysis(analysis_args) => {
            let config = Config::load(home).await?;
            let out = commands::analysis(
                &config,
                mode,
                analysis_args.flow(),
                analysis_args.window(),
                analysis_args.reference(),
            )
            .await?;
            print(&out, analysis_args.json());
        }
    }
    Ok(())
}

fn print<T>(out: &Out<T>, json: bool)
where
    T: Serialize + Clone + Debug,
{
    if json {
        out.print_json()
    } else {
        out.print()
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
