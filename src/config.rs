//! Configuration file handling for spendlens.
//!
//! The configuration file is stored at `$SPENDLENS_HOME/config.json` and holds the base URL of the
//! finance tracker backend along with request and display settings.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "spendlens";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CURRENCY_SYMBOL: &str = "₹";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDLENS_HOME` and from there it loads `$SPENDLENS_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    backend_url: Url,
}

impl Config {
    /// Creates the home directory, if needed, and writes an initial `config.json` pointing at
    /// `backend_url` with default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/spendlens`
    /// - `backend_url` - The base URL of the tracker backend, e.g. `http://localhost:5000`. The
    ///   collections are read from `{backend_url}/api/...`.
    ///
    /// # Errors
    /// - Returns an error if the URL is not an http(s) URL or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, backend_url: &str) -> Res<Self> {
        let backend = parse_backend_url(backend_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendlens home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            backend_url: backend_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            backend_url: backend,
        })
    }

    /// This will
    /// - validate that `spendlens_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    ///
    /// # Errors
    /// - Every failure is an `ErrorType::Config` error.
    pub async fn load(spendlens_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(spendlens_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The spendlens home directory is missing, run 'spendlens init'")?;

        let _ = utils::read_dir(&root)
            .await
            .context("The spendlens home is not a directory")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let backend_url = parse_backend_url(&config_file.backend_url)
            .with_context(|| format!("Bad backend_url in '{}'", config_path.display()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            backend_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The backend base URL, always ending in `/` so that collection paths can be joined onto it.
    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.request_timeout_secs)
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendlens",
///   "config_version": 1,
///   "backend_url": "http://localhost:5000",
///   "request_timeout_secs": 30,
///   "currency_symbol": "₹"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendlens"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the finance tracker backend
    backend_url: String,

    /// Per-request timeout when talking to the backend
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Symbol printed in front of amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backend_url: String::new(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Parses and validates the backend base URL. Only `http` and `https` are accepted. A trailing `/`
/// is added to the path when missing so `Url::join` appends rather than replaces the last segment.
fn parse_backend_url(s: &str) -> Res<Url> {
    let mut url = Url::parse(s.trim()).with_context(|| format!("Invalid backend URL '{s}'"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("Unsupported backend URL scheme '{other}', expected http or https"),
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
