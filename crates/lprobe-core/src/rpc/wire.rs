//! JSON-RPC 2.0 request/response shapes for the two reads we make

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pubkey::Pubkey;
use crate::transaction::{AccountView, CompiledInstruction, TransactionView};

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

impl<T> RpcResponse<T> {
    /// `Ok(None)` when the node answered with a `null` result
    pub fn into_result(self) -> Result<Option<T>> {
        if let Some(err) = self.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(self.result)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EncodedTransaction {
    pub slot: u64,
    pub block_time: Option<i64>,
    pub transaction: UiTransaction,
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UiTransaction {
    pub signatures: Vec<String>,
    pub message: UiMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UiMessage {
    pub account_keys: Vec<String>,
    pub instructions: Vec<UiInstruction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UiInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    /// base58
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionMeta {
    #[serde(default)]
    pub loaded_addresses: Option<LoadedAddresses>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoadedAddresses {
    #[serde(default)]
    pub writable: Vec<String>,
    #[serde(default)]
    pub readonly: Vec<String>,
}

impl EncodedTransaction {
    pub fn into_view(self, signature: &str) -> Result<TransactionView> {
        let loaded = self
            .meta
            .and_then(|m| m.loaded_addresses)
            .unwrap_or_default();

        let account_keys = self
            .transaction
            .message
            .account_keys
            .iter()
            .chain(loaded.writable.iter())
            .chain(loaded.readonly.iter())
            .map(|k| k.parse::<Pubkey>())
            .collect::<Result<Vec<_>>>()?;

        let instructions = self
            .transaction
            .message
            .instructions
            .into_iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: ix.program_id_index,
                    accounts: ix.accounts,
                    data: bs58::decode(&ix.data).into_vec()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let signature = self
            .transaction
            .signatures
            .into_iter()
            .next()
            .unwrap_or_else(|| signature.to_string());

        Ok(TransactionView {
            signature,
            slot: self.slot,
            block_time: self.block_time,
            account_keys,
            instructions,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountInfoResult {
    pub context: RpcContext,
    pub value: Option<UiAccount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcContext {
    pub slot: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UiAccount {
    /// `[payload, encoding]`
    pub data: (String, String),
    pub owner: String,
    pub lamports: u64,
}

impl UiAccount {
    pub fn into_view(self, address: Pubkey, slot: u64) -> Result<AccountView> {
        let (payload, encoding) = self.data;
        if encoding != "base64" {
            return Err(Error::Decode(format!(
                "unexpected account data encoding '{}'",
                encoding
            )));
        }
        let data = base64::engine::general_purpose::STANDARD.decode(payload)?;

        Ok(AccountView {
            address,
            owner: self.owner.parse()?,
            lamports: self.lamports,
            slot,
            data,
        })
    }
}
