//! Sell command implementation.
//!
//! Fetches a sell transaction and its escrow state account, then reports where
//! the sighash, price, timestamp, seller, token account and mint appear in the
//! raw bytes. Command-line values override the `[sell]` config table.

use anyhow::{Context, Result};
use clap::Args;
use lprobe_core::encode::parse_timestamp;
use lprobe_core::{Config, Pubkey, inspect_sell};

use super::{Output, rpc_client};

#[derive(Args, Debug, Default)]
pub struct SellArgs {
    /// Transaction signature of the sell
    #[arg(long)]
    pub signature: Option<String>,

    /// Escrow state account address
    #[arg(long)]
    pub escrow: Option<Pubkey>,

    /// Listed price in base units (lamports)
    #[arg(long)]
    pub price: Option<u64>,

    /// Listing timestamp, Unix seconds or RFC 3339
    #[arg(long, allow_hyphen_values = true)]
    pub timestamp: Option<String>,

    /// Index of the sell instruction within the transaction
    #[arg(long)]
    pub instruction_index: Option<usize>,

    /// Instruction name used for the sighash
    #[arg(long)]
    pub instruction_name: Option<String>,

    /// Escrow account type name used for the account discriminator
    #[arg(long)]
    pub account_type: Option<String>,

    /// List every occurrence, not just the first
    #[arg(long)]
    pub all: bool,

    /// Append hexdumps of both buffers
    #[arg(long)]
    pub dump: bool,
}

/// Apply command-line overrides on top of the config file
pub fn merge(args: &SellArgs, config: &Config) -> Result<Config> {
    let mut config = config.clone();
    let sell = &mut config.sell;

    if let Some(signature) = &args.signature {
        sell.signature = Some(signature.clone());
    }
    if let Some(escrow) = args.escrow {
        sell.escrow = Some(escrow);
    }
    if let Some(price) = args.price {
        sell.price = Some(price);
    }
    if let Some(ts) = &args.timestamp {
        sell.timestamp = Some(parse_timestamp(ts).context("Invalid --timestamp")?);
    }
    if let Some(index) = args.instruction_index {
        sell.instruction_index = index;
    }
    if let Some(name) = &args.instruction_name {
        sell.instruction_name = name.clone();
    }
    if let Some(name) = &args.account_type {
        sell.account_type = Some(name.clone());
    }

    Ok(config)
}

/// Run the sell command
pub fn run(args: SellArgs, config: &Config, output: &Output) -> Result<()> {
    let config = merge(&args, config)?;
    let mut request = config
        .sell
        .to_inspection()
        .context("Incomplete sell inspection settings")?;
    request.all_occurrences = args.all || output.all_occurrences;

    let client = rpc_client(&config.rpc);
    let report = inspect_sell(&client, &request)
        .with_context(|| format!("Failed to inspect sell {}", request.signature))?;

    let output = Output::with_hexdump(output.clone(), args.dump);
    output.inspection(&report)
}
