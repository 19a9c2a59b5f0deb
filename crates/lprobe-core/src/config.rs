//! TOML configuration
//!
//! ```toml
//! [rpc]
//! url = "https://api.mainnet-beta.solana.com"
//!
//! [sell]
//! signature = "5ixv..."
//! escrow = "BQWk..."
//! price = 69690000000
//! ```
//!
//! Every table and key is optional; unknown keys are rejected so typos do not
//! silently fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::inspect::{AccountPositions, SellInspection};
use crate::pubkey::Pubkey;
use crate::rpc::DEFAULT_RPC_URL;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lprobe.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rpc: RpcConfig,
    pub sell: SellConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
    pub url: String,
    /// Attempts per request, including the first
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            max_retries: 3,
            initial_backoff_ms: 100,
        }
    }
}

/// Inputs for inspecting one sell instruction and its escrow account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SellConfig {
    pub signature: Option<String>,
    pub escrow: Option<Pubkey>,
    pub price: Option<u64>,
    /// Unix seconds; not probed when absent
    pub timestamp: Option<i64>,
    pub instruction_index: usize,
    pub instruction_name: String,
    /// Account type name used for the account discriminator
    pub account_type: Option<String>,
    pub seller_position: usize,
    pub token_account_position: usize,
    pub mint_position: usize,
}

impl Default for SellConfig {
    fn default() -> Self {
        let positions = AccountPositions::default();
        Self {
            signature: None,
            escrow: None,
            price: None,
            timestamp: None,
            instruction_index: 0,
            instruction_name: "sell".to_string(),
            account_type: None,
            seller_position: positions.seller,
            token_account_position: positions.token_account,
            mint_position: positions.mint,
        }
    }
}

impl SellConfig {
    /// Validate required fields and build the inspection request
    pub fn to_inspection(&self) -> Result<SellInspection> {
        let signature = self
            .signature
            .clone()
            .ok_or_else(|| Error::Config("missing sell.signature".to_string()))?;
        let escrow = self
            .escrow
            .ok_or_else(|| Error::Config("missing sell.escrow".to_string()))?;
        let price = self
            .price
            .ok_or_else(|| Error::Config("missing sell.price".to_string()))?;

        let mut builder = SellInspection::builder(signature, escrow, price)
            .instruction_index(self.instruction_index)
            .instruction_name(self.instruction_name.clone())
            .positions(AccountPositions {
                seller: self.seller_position,
                token_account: self.token_account_position,
                mint: self.mint_position,
            });
        if let Some(ts) = self.timestamp {
            builder = builder.timestamp(ts);
        }
        if let Some(name) = &self.account_type {
            builder = builder.account_type(name.clone());
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub color: bool,
    /// Append a hexdump of each probed buffer
    pub hexdump: bool,
    /// List every occurrence, not just the first
    pub all_occurrences: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: true,
            hexdump: false,
            all_occurrences: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the first config file that exists.
    ///
    /// An explicit path must exist. Without one, `lprobe.toml` in the working
    /// directory and then `<config dir>/lprobe/config.toml` are tried; if
    /// neither exists the defaults are used.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for path in Self::default_paths() {
            if path.is_file() {
                debug!("Using config file {}", path.display());
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("lprobe").join("config.toml"));
        }
        paths
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
