//! Hexdump command implementation.
//!
//! Displays a local buffer in traditional hexdump format.
//!
//! # Output Format
//!
//! ```text
//! 0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use anyhow::Result;
use clap::Args;
use lprobe_core::hexdump;

use super::input::BufferInput;

#[derive(Args, Debug)]
pub struct HexdumpArgs {
    #[command(flatten)]
    pub input: BufferInput,

    /// Show the ASCII column
    #[arg(long)]
    pub ascii: bool,
}

/// Run the hexdump command
pub fn run(args: HexdumpArgs) -> Result<()> {
    let bytes = args.input.load()?;

    println!("Hexdump of {} ({} bytes):", args.input.describe(), bytes.len());
    println!();
    print!("{}", hexdump(&bytes, args.ascii));

    Ok(())
}
