//! # lprobe-core
//!
//! Diagnostic toolkit for guessing the binary layout of on-chain instruction
//! data and account state.
//!
//! This crate provides:
//! - A layout prober that reports where known byte patterns occur in a buffer
//! - Encoders that turn prices, timestamps, public keys and discriminators
//!   into candidate patterns
//! - A blocking JSON-RPC client for fetching raw transactions and accounts
//! - The sell instruction / escrow account inspection built on the above
//! - Text and JSON reports
//!
//! Reported offsets are hints for a human, never a trusted decoder.

pub mod config;
pub mod encode;
pub mod error;
pub mod inspect;
pub mod probe;
pub mod pubkey;
pub mod report;
pub mod rpc;
pub mod transaction;

pub use config::{Config, ReportConfig, RpcConfig, SellConfig};
pub use encode::{CandidateKind, CandidateSpec, account_discriminator, parse_hex, sighash};
pub use error::{Error, Result};
pub use inspect::{
    AccountPositions, BufferProbe, InspectionReport, SellInspection, inspect_account,
    inspect_sell,
};
pub use probe::{Candidate, LayoutMap, ProbeEntry, ProbeResult, find_first, occurrences, probe};
pub use pubkey::Pubkey;
pub use report::{TextReport, hexdump};
pub use rpc::{ChainSource, RpcClient};
pub use transaction::{AccountView, CompiledInstruction, TransactionView};
