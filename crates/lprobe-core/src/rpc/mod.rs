//! Retrieval of raw transactions and account blobs from a chain node

mod client;
#[cfg(test)]
pub mod mock;
mod wire;

pub use client::RpcClient;
#[cfg(test)]
pub use mock::MockChain;

use crate::error::Result;
use crate::pubkey::Pubkey;
use crate::transaction::{AccountView, TransactionView};

/// Default public mainnet endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Source of raw on-chain data
pub trait ChainSource {
    fn get_transaction(&self, signature: &str) -> Result<TransactionView>;

    fn get_account(&self, address: &Pubkey) -> Result<AccountView>;
}
