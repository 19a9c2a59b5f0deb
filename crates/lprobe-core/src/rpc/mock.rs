use std::collections::HashMap;

use super::ChainSource;
use crate::error::{Error, Result};
use crate::pubkey::Pubkey;
use crate::transaction::{AccountView, TransactionView};

/// In-memory chain for tests
#[derive(Debug, Default)]
pub struct MockChain {
    transactions: HashMap<String, TransactionView>,
    accounts: HashMap<Pubkey, AccountView>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transaction(mut self, tx: TransactionView) -> Self {
        self.transactions.insert(tx.signature.clone(), tx);
        self
    }

    pub fn with_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.insert(
            address,
            AccountView {
                address,
                owner: Pubkey::default(),
                lamports: 1_000_000,
                slot: 0,
                data,
            },
        );
        self
    }
}

impl ChainSource for MockChain {
    fn get_transaction(&self, signature: &str) -> Result<TransactionView> {
        self.transactions
            .get(signature)
            .cloned()
            .ok_or_else(|| Error::TransactionNotFound(signature.to_string()))
    }

    fn get_account(&self, address: &Pubkey) -> Result<AccountView> {
        self.accounts
            .get(address)
            .cloned()
            .ok_or_else(|| Error::AccountNotFound(address.to_string()))
    }
}
