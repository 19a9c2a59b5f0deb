//! Account command implementation.

use anyhow::{Context, Result};
use clap::Args;
use lprobe_core::{CandidateSpec, Config, Pubkey, inspect_account};

use super::probe::build_candidates;
use super::{Output, rpc_client};

#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account address
    pub address: Pubkey,

    /// Candidate as label=kind:value
    #[arg(short = 'c', long = "candidate")]
    pub candidates: Vec<CandidateSpec>,

    /// List every occurrence, not just the first
    #[arg(long)]
    pub all: bool,

    /// Append a hexdump of the account data
    #[arg(long)]
    pub dump: bool,
}

/// Run the account command
pub fn run(args: AccountArgs, config: &Config, output: &Output) -> Result<()> {
    let candidates = build_candidates(&args.candidates)?;
    let client = rpc_client(&config.rpc);

    let probe = inspect_account(
        &client,
        &args.address,
        &candidates,
        args.all || output.all_occurrences,
    )
    .with_context(|| format!("Failed to inspect account {}", args.address))?;

    let output = Output::with_hexdump(output.clone(), args.dump);
    output.buffer(&probe)
}
