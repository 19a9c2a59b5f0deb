//! Probe command implementation.
//!
//! Searches a local buffer (hex or file) for candidate patterns given as
//! `label=kind:value`, e.g. `-c price=u64:69690000000 -c tag=sighash:sell`.

use anyhow::{Context, Result};
use clap::Args;
use lprobe_core::{BufferProbe, Candidate, CandidateSpec};

use super::Output;
use super::input::BufferInput;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub input: BufferInput,

    /// Candidate as label=kind:value (kinds: u64, i64, u32, u16, pubkey,
    /// sighash, account, hex, utf8, timestamp)
    #[arg(short = 'c', long = "candidate", required = true)]
    pub candidates: Vec<CandidateSpec>,

    /// List every occurrence, not just the first
    #[arg(long)]
    pub all: bool,

    /// Append a hexdump of the buffer
    #[arg(long)]
    pub dump: bool,
}

/// Encode all candidate specs, failing on the first bad one
pub fn build_candidates(specs: &[CandidateSpec]) -> Result<Vec<Candidate>> {
    specs
        .iter()
        .map(|spec| spec.to_candidate().context("Invalid candidate"))
        .collect()
}

/// Run the probe command
pub fn run(args: ProbeArgs, output: &Output) -> Result<()> {
    let data = args.input.load()?;
    let candidates = build_candidates(&args.candidates)?;

    let probe = BufferProbe::run(
        args.input.describe(),
        data,
        &candidates,
        args.all || output.all_occurrences,
    );

    let output = Output::with_hexdump(output.clone(), args.dump);
    output.buffer(&probe)
}
