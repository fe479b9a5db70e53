use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` that points at `backend_url`, along
/// with default settings.
///
/// # Arguments
/// - `spendlens_home` - The directory that will hold the configuration, e.g. `$HOME/spendlens`
/// - `backend_url` - The base URL of the tracker backend, e.g. `http://localhost:5000`
///
/// # Errors
/// - Returns an error if `backend_url` is not an http(s) URL or if any file operations fail.
pub async fn init(spendlens_home: &Path, backend_url: &str) -> Result<Out<()>> {
    let config = Config::create(spendlens_home, backend_url)
        .await
        .context("Unable to create the data directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the spendlens config at {}",
        config.config_path().display()
    )
    .into())
}
