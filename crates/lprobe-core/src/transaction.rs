//! Decoded transaction and account views
//!
//! Only what the prober needs: the account-key table, raw instruction data and
//! raw account data. Nothing here interprets those bytes.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    /// Indexes into the transaction's account-key table
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    /// Static keys followed by lookup-table keys (writable, then readonly)
    pub account_keys: Vec<Pubkey>,
    pub instructions: Vec<CompiledInstruction>,
}

impl TransactionView {
    pub fn instruction(&self, ix_index: usize) -> Result<&CompiledInstruction> {
        self.instructions
            .get(ix_index)
            .ok_or(Error::InstructionNotFound(ix_index))
    }

    /// Public key of the account at `position` in instruction `ix_index`'s account list.
    ///
    /// `position` counts within the instruction, not the explorer's numbering
    /// of the whole transaction.
    pub fn instruction_account(&self, ix_index: usize, position: usize) -> Result<&Pubkey> {
        let ix = self.instruction(ix_index)?;
        let key_index = *ix
            .accounts
            .get(position)
            .ok_or(Error::AccountPositionNotFound { ix_index, position })?;
        self.key(key_index as usize)
    }

    pub fn program_id(&self, ix_index: usize) -> Result<&Pubkey> {
        let ix = self.instruction(ix_index)?;
        self.key(ix.program_id_index as usize)
    }

    fn key(&self, index: usize) -> Result<&Pubkey> {
        self.account_keys
            .get(index)
            .ok_or(Error::AccountKeyNotFound(index))
    }

    pub fn block_time_utc(&self) -> Option<DateTime<Utc>> {
        self.block_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub slot: u64,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new([n; 32])
    }

    fn sample() -> TransactionView {
        TransactionView {
            signature: "sig".to_string(),
            slot: 100,
            block_time: Some(1_646_092_800),
            account_keys: vec![key(10), key(11), key(12)],
            instructions: vec![CompiledInstruction {
                program_id_index: 2,
                accounts: vec![0, 1, 7],
                data: vec![1, 2, 3],
            }],
        }
    }

    #[test]
    fn test_instruction_account_resolves_through_key_table() {
        let tx = sample();
        assert_eq!(tx.instruction_account(0, 0).unwrap(), &key(10));
        assert_eq!(tx.instruction_account(0, 1).unwrap(), &key(11));
        assert_eq!(tx.program_id(0).unwrap(), &key(12));
    }

    #[test]
    fn test_instruction_account_missing_instruction() {
        let tx = sample();
        assert!(matches!(
            tx.instruction_account(3, 0),
            Err(Error::InstructionNotFound(3))
        ));
    }

    #[test]
    fn test_instruction_account_missing_position() {
        let tx = sample();
        assert!(matches!(
            tx.instruction_account(0, 5),
            Err(Error::AccountPositionNotFound {
                ix_index: 0,
                position: 5
            })
        ));
    }

    #[test]
    fn test_instruction_account_missing_key() {
        let tx = sample();
        assert!(matches!(
            tx.instruction_account(0, 2),
            Err(Error::AccountKeyNotFound(7))
        ));
    }

    #[test]
    fn test_block_time_utc() {
        let tx = sample();
        assert_eq!(
            tx.block_time_utc().unwrap().to_rfc3339(),
            "2022-03-01T00:00:00+00:00"
        );

        let tx = TransactionView {
            block_time: None,
            ..sample()
        };
        assert!(tx.block_time_utc().is_none());
    }
}
