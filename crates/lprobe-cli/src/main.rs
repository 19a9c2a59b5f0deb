use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lprobe_core::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Output;

#[derive(Parser)]
#[command(name = "lprobe")]
#[command(about = "Locate known values inside raw instruction and account bytes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to lprobe.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides [rpc].url
    #[arg(long, global = true, env = "LPROBE_RPC_URL")]
    rpc_url: Option<String>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Also write the report as JSON to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe a local buffer for candidate patterns
    Probe(commands::probe::ProbeArgs),
    /// Inspect a sell instruction and its escrow account
    Sell(commands::sell::SellArgs),
    /// Fetch one account and probe or dump it
    Account(commands::account::AccountArgs),
    /// Print the discriminator of an instruction or account name
    Sighash(commands::sighash::SighashArgs),
    /// Hexdump a local buffer
    Hexdump(commands::hexdump::HexdumpArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("lprobe=info".parse()?))
        .init();

    let cli = Cli::parse();

    let (mut config, path) =
        Config::discover(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(p) = path {
        info!("Loaded config from {}", p.display());
    }

    if let Some(url) = cli.rpc_url {
        config.rpc.url = url;
    }
    if cli.no_color {
        config.report.color = false;
    }

    let output = Output::new(cli.json, cli.output, &config.report);

    match cli.command {
        Command::Probe(args) => commands::probe::run(args, &output),
        Command::Sell(args) => commands::sell::run(args, &config, &output),
        Command::Account(args) => commands::account::run(args, &config, &output),
        Command::Sighash(args) => commands::sighash::run(args),
        Command::Hexdump(args) => commands::hexdump::run(args),
    }
}
