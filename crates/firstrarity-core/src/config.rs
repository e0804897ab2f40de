//! Run configuration
//!
//! Everything is fixed at config time: defaults mirror the collection's
//! known constants, an optional `firstrarity.toml` may override them, and
//! secrets can come from the environment.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{RarityError, Result};

/// Default config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "firstrarity.toml";

/// Environment variable overriding [`Config::etherscan_api_key`].
pub const ENV_ETHERSCAN_API_KEY: &str = "FIRSTRARITY_ETHERSCAN_API_KEY";

/// Environment variable overriding [`Config::rpc_url`].
pub const ENV_RPC_URL: &str = "FIRSTRARITY_RPC_URL";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address of the collection contract.
    pub contract_address: String,
    /// Etherscan key used for the one-off ABI fetch.
    pub etherscan_api_key: String,
    /// Ethereum JSON-RPC endpoint used for `eth_call`.
    pub rpc_url: String,
    /// Paginated asset index endpoint.
    pub index_url: String,
    /// Etherscan API endpoint.
    pub etherscan_url: String,
    /// Number of claimed identifiers in the collection.
    pub universe_size: usize,
    /// Identifiers requested per index page.
    pub page_size: usize,
    /// Pause after each index page, in milliseconds.
    pub index_delay_ms: u64,
    /// Pause after each contract call, in milliseconds.
    pub contract_delay_ms: u64,
    /// Per-request HTTP timeout, in seconds.
    pub http_timeout_secs: u64,
    /// Directory receiving rarity tables and histograms.
    pub output_dir: PathBuf,
    /// Progress bar granularity (identifiers per slot).
    pub progress_step: usize,
    /// Histogram bin edges run `0..histogram_bins`.
    pub histogram_bins: usize,
    pub histogram_x_max: f64,
    pub histogram_y_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: "0xc9Cb0FEe73f060Db66D2693D92d75c825B1afdbF".to_string(),
            etherscan_api_key: "YOUR-ETHERSCAN-API-KEY".to_string(),
            rpc_url: "https://mainnet.infura.io/v3/YOUR-PROJECT-ID".to_string(),
            index_url: "https://api.opensea.io/api/v1/assets".to_string(),
            etherscan_url: "https://api.etherscan.io/api".to_string(),
            universe_size: 5000,
            page_size: 50,
            index_delay_ms: 100,
            contract_delay_ms: 2,
            http_timeout_secs: 30,
            output_dir: PathBuf::from("."),
            progress_step: 1000,
            histogram_bins: 31,
            histogram_x_max: 30.0,
            histogram_y_max: 0.25,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist, then apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err.into()),
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| RarityError::Config(e.to_string()))
    }

    /// Overwrite secrets from the given variable lookup.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_ETHERSCAN_API_KEY) {
            self.etherscan_api_key = key;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = url;
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(RarityError::Config("page_size must be positive".into()));
        }
        if self.universe_size == 0 {
            return Err(RarityError::Config("universe_size must be positive".into()));
        }
        if self.universe_size < self.page_size {
            return Err(RarityError::Config(format!(
                "universe_size {} is smaller than page_size {}",
                self.universe_size, self.page_size
            )));
        }
        if self.progress_step == 0 {
            return Err(RarityError::Config("progress_step must be positive".into()));
        }
        if self.histogram_bins < 2 {
            return Err(RarityError::Config("histogram_bins must be at least 2".into()));
        }
        Ok(())
    }

    pub fn index_delay(&self) -> Duration {
        Duration::from_millis(self.index_delay_ms)
    }

    pub fn contract_delay(&self) -> Duration {
        Duration::from_millis(self.contract_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
