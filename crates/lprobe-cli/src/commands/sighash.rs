//! Sighash command implementation.

use anyhow::Result;
use clap::Args;
use lprobe_core::encode::format_hex;
use lprobe_core::{account_discriminator, sighash};

#[derive(Args, Debug)]
pub struct SighashArgs {
    /// Instruction name (or account type name with --account)
    pub name: String,

    /// Hash with the "account:" namespace instead of "global:"
    #[arg(long)]
    pub account: bool,
}

/// Run the sighash command
pub fn run(args: SighashArgs) -> Result<()> {
    let (namespace, bytes) = if args.account {
        ("account", account_discriminator(&args.name))
    } else {
        ("global", sighash(&args.name))
    };

    println!("{}:{}", namespace, args.name);
    println!("  hex:   {}", format_hex(&bytes));
    println!("  bytes: {:?}", bytes);

    Ok(())
}
