//! Sell instruction / escrow account inspection
//!
//! Fetches one transaction and one escrow account, encodes the values the
//! caller already knows (price, timestamp, seller, token account, mint,
//! discriminators) and reports where each shows up in the raw bytes.
//!
//! ## Example
//!
//! ```ignore
//! use lprobe_core::{RpcClient, SellInspection, inspect_sell};
//!
//! let request = SellInspection::builder(signature, escrow, 69_690_000_000)
//!     .account_type("SellerTradeState")
//!     .build();
//! let report = inspect_sell(&RpcClient::new(url), &request)?;
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::encode;
use crate::error::Result;
use crate::probe::{Candidate, LayoutMap, ProbeResult, occurrences, probe, unique_candidates};
use crate::pubkey::Pubkey;
use crate::rpc::ChainSource;

/// Positions within the instruction's own account list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountPositions {
    pub seller: usize,
    pub token_account: usize,
    pub mint: usize,
}

impl Default for AccountPositions {
    fn default() -> Self {
        Self {
            seller: 0,
            token_account: 2,
            mint: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellInspection {
    pub signature: String,
    pub escrow: Pubkey,
    pub price: u64,
    pub timestamp: Option<i64>,
    pub instruction_index: usize,
    pub instruction_name: String,
    pub account_type: Option<String>,
    pub positions: AccountPositions,
    pub all_occurrences: bool,
}

impl SellInspection {
    pub fn builder(
        signature: impl Into<String>,
        escrow: Pubkey,
        price: u64,
    ) -> SellInspectionBuilder {
        SellInspectionBuilder {
            inner: SellInspection {
                signature: signature.into(),
                escrow,
                price,
                timestamp: None,
                instruction_index: 0,
                instruction_name: "sell".to_string(),
                account_type: None,
                positions: AccountPositions::default(),
                all_occurrences: false,
            },
        }
    }
}

/// Builder for SellInspection
#[derive(Debug, Clone)]
pub struct SellInspectionBuilder {
    inner: SellInspection,
}

impl SellInspectionBuilder {
    pub fn timestamp(mut self, secs: i64) -> Self {
        self.inner.timestamp = Some(secs);
        self
    }

    pub fn instruction_index(mut self, index: usize) -> Self {
        self.inner.instruction_index = index;
        self
    }

    pub fn instruction_name(mut self, name: impl Into<String>) -> Self {
        self.inner.instruction_name = name.into();
        self
    }

    pub fn account_type(mut self, name: impl Into<String>) -> Self {
        self.inner.account_type = Some(name.into());
        self
    }

    pub fn positions(mut self, positions: AccountPositions) -> Self {
        self.inner.positions = positions;
        self
    }

    pub fn all_occurrences(mut self, enabled: bool) -> Self {
        self.inner.all_occurrences = enabled;
        self
    }

    pub fn build(self) -> SellInspection {
        self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrences {
    pub label: String,
    pub offsets: Vec<usize>,
}

/// Probe outcome for one buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferProbe {
    pub title: String,
    pub length: usize,
    pub result: ProbeResult,
    pub layout: LayoutMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub occurrences: Vec<Occurrences>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl BufferProbe {
    pub fn run(
        title: impl Into<String>,
        data: Vec<u8>,
        candidates: &[Candidate],
        all: bool,
    ) -> Self {
        let result = probe(&data, candidates);
        let layout = LayoutMap::build(data.len(), &result);
        let repeats = if all {
            unique_candidates(candidates)
                .map(|c| Occurrences {
                    label: c.label.clone(),
                    offsets: occurrences(&data, &c.pattern),
                })
                .collect()
        } else {
            Vec::new()
        };

        let title = title.into();
        debug!(
            "{}: {}/{} candidates found in {} bytes",
            title,
            result.found_count(),
            result.len(),
            data.len()
        );

        Self {
            title,
            length: data.len(),
            result,
            layout,
            occurrences: repeats,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKeys {
    pub seller: Pubkey,
    pub token_account: Pubkey,
    pub mint: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<String>,
    pub program_id: Pubkey,
    pub escrow: Pubkey,
    pub keys: ResolvedKeys,
    pub instruction: BufferProbe,
    pub escrow_state: BufferProbe,
}

/// Candidates searched for in the instruction data
pub fn instruction_candidates(request: &SellInspection) -> Vec<Candidate> {
    let mut candidates = vec![
        Candidate::new("sighash", encode::sighash(&request.instruction_name)),
        Candidate::new("price", encode::u64_le(request.price)),
    ];
    if let Some(ts) = request.timestamp {
        candidates.push(Candidate::new("timestamp", encode::i64_le(ts)));
    }
    candidates
}

/// Candidates searched for in the escrow account data
pub fn escrow_candidates(request: &SellInspection, keys: &ResolvedKeys) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(6);
    if let Some(name) = &request.account_type {
        candidates.push(Candidate::new(
            "discriminator",
            encode::account_discriminator(name),
        ));
    }
    candidates.push(Candidate::new("price", encode::u64_le(request.price)));
    if let Some(ts) = request.timestamp {
        candidates.push(Candidate::new("timestamp", encode::i64_le(ts)));
    }
    candidates.push(Candidate::new("seller", encode::pubkey_bytes(&keys.seller)));
    candidates.push(Candidate::new(
        "token_account",
        encode::pubkey_bytes(&keys.token_account),
    ));
    candidates.push(Candidate::new("mint", encode::pubkey_bytes(&keys.mint)));
    candidates
}

/// Fetch, resolve and probe. Any failure aborts with no partial report.
pub fn inspect_sell<S: ChainSource>(
    source: &S,
    request: &SellInspection,
) -> Result<InspectionReport> {
    info!("Fetching transaction {}", request.signature);
    let tx = source.get_transaction(&request.signature)?;

    let ix_index = request.instruction_index;
    let ix = tx.instruction(ix_index)?;
    let program_id = *tx.program_id(ix_index)?;

    let positions = request.positions;
    let keys = ResolvedKeys {
        seller: *tx.instruction_account(ix_index, positions.seller)?,
        token_account: *tx.instruction_account(ix_index, positions.token_account)?,
        mint: *tx.instruction_account(ix_index, positions.mint)?,
    };
    debug!(
        "Resolved seller={} token_account={} mint={}",
        keys.seller, keys.token_account, keys.mint
    );

    info!("Fetching escrow account {}", request.escrow);
    let escrow = source.get_account(&request.escrow)?;

    let instruction = BufferProbe::run(
        format!("Instruction {} data", ix_index),
        ix.data.clone(),
        &instruction_candidates(request),
        request.all_occurrences,
    );
    let escrow_state = BufferProbe::run(
        "Escrow state data",
        escrow.data,
        &escrow_candidates(request, &keys),
        request.all_occurrences,
    );

    Ok(InspectionReport {
        signature: tx.signature.clone(),
        slot: tx.slot,
        block_time: tx.block_time_utc().map(|t| t.to_rfc3339()),
        program_id,
        escrow: request.escrow,
        keys,
        instruction,
        escrow_state,
    })
}

/// Fetch one account and probe it with caller-supplied candidates
pub fn inspect_account<S: ChainSource>(
    source: &S,
    address: &Pubkey,
    candidates: &[Candidate],
    all: bool,
) -> Result<BufferProbe> {
    info!("Fetching account {}", address);
    let account = source.get_account(address)?;
    Ok(BufferProbe::run(
        format!("Account {} (owner {})", address, account.owner),
        account.data,
        candidates,
        all,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rpc::MockChain;
    use crate::transaction::{CompiledInstruction, TransactionView};

    const PRICE: u64 = 69_690_000_000;

    fn key(n: u8) -> Pubkey {
        Pubkey::new([n; 32])
    }

    /// Keys: 0 seller, 1 system, 2 token account, 3 program, 4 mint, 5 escrow
    fn sell_transaction(data: Vec<u8>) -> TransactionView {
        TransactionView {
            signature: "sell-sig".to_string(),
            slot: 42,
            block_time: Some(1_646_092_800),
            account_keys: (0..6).map(|n| key(n + 1)).collect(),
            instructions: vec![CompiledInstruction {
                program_id_index: 3,
                accounts: vec![0, 1, 2, 2, 4, 5],
                data,
            }],
        }
    }

    fn instruction_data() -> Vec<u8> {
        let mut data = encode::sighash("sell").to_vec();
        data.extend_from_slice(&[0xFE, 0xFD]);
        data.extend_from_slice(&encode::u64_le(PRICE));
        data.extend_from_slice(&[0xFF; 8]);
        data
    }

    fn escrow_data() -> Vec<u8> {
        let mut data = encode::account_discriminator("SellerTradeState").to_vec();
        data.extend_from_slice(&key(1).to_bytes());
        data.extend_from_slice(&key(3).to_bytes());
        data.extend_from_slice(&key(5).to_bytes());
        data.extend_from_slice(&encode::u64_le(PRICE));
        data.extend_from_slice(&encode::i64_le(-1));
        data
    }

    fn chain() -> MockChain {
        MockChain::new()
            .with_transaction(sell_transaction(instruction_data()))
            .with_account(key(6), escrow_data())
    }

    fn request() -> SellInspection {
        SellInspection::builder("sell-sig", key(6), PRICE)
            .account_type("SellerTradeState")
            .build()
    }

    #[test]
    fn test_inspect_sell_finds_planted_fields() {
        let report = inspect_sell(&chain(), &request()).unwrap();

        assert_eq!(report.slot, 42);
        assert_eq!(report.program_id, key(4));
        assert_eq!(report.keys.seller, key(1));
        assert_eq!(report.keys.token_account, key(3));
        assert_eq!(report.keys.mint, key(5));
        assert_eq!(
            report.block_time.as_deref(),
            Some("2022-03-01T00:00:00+00:00")
        );

        let ix = &report.instruction.result;
        assert_eq!(ix.get("sighash"), Some(0));
        assert_eq!(ix.get("price"), Some(10));
        assert!(ix.entry("timestamp").is_none());
        assert_eq!(report.instruction.length, 26);

        let state = &report.escrow_state.result;
        assert_eq!(state.get("discriminator"), Some(0));
        assert_eq!(state.get("seller"), Some(8));
        assert_eq!(state.get("token_account"), Some(40));
        assert_eq!(state.get("mint"), Some(72));
        assert_eq!(state.get("price"), Some(104));
        assert_eq!(report.escrow_state.layout.unexplained_bytes(), 8);
    }

    #[test]
    fn test_inspect_sell_signed_timestamp() {
        let request = SellInspection::builder("sell-sig", key(6), PRICE)
            .timestamp(-1)
            .build();
        let report = inspect_sell(&chain(), &request).unwrap();

        assert_eq!(report.instruction.result.get("timestamp"), Some(18));
        assert_eq!(report.escrow_state.result.get("timestamp"), Some(112));
        assert!(report.escrow_state.result.entry("discriminator").is_none());
    }

    #[test]
    fn test_inspect_sell_all_occurrences() {
        let request = SellInspection::builder("sell-sig", key(6), PRICE)
            .all_occurrences(true)
            .build();
        let report = inspect_sell(&chain(), &request).unwrap();
        let price = report
            .instruction
            .occurrences
            .iter()
            .find(|o| o.label == "price")
            .unwrap();
        assert_eq!(price.offsets, vec![10]);
    }

    #[test]
    fn test_inspect_sell_missing_transaction() {
        let request = SellInspection::builder("unknown", key(6), PRICE).build();
        let err = inspect_sell(&chain(), &request).unwrap_err();
        assert!(matches!(err, Error::TransactionNotFound(_)));
    }

    #[test]
    fn test_inspect_sell_missing_escrow() {
        let request = SellInspection::builder("sell-sig", key(99), PRICE).build();
        let err = inspect_sell(&chain(), &request).unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(_)));
    }

    #[test]
    fn test_inspect_sell_bad_position_aborts() {
        let request = SellInspection::builder("sell-sig", key(6), PRICE)
            .positions(AccountPositions {
                seller: 0,
                token_account: 2,
                mint: 9,
            })
            .build();
        let err = inspect_sell(&chain(), &request).unwrap_err();
        assert!(matches!(
            err,
            Error::AccountPositionNotFound { position: 9, .. }
        ));
    }

    #[test]
    fn test_inspect_sell_wrong_instruction_name() {
        let request = SellInspection::builder("sell-sig", key(6), PRICE)
            .instruction_name("buy")
            .build();
        let report = inspect_sell(&chain(), &request).unwrap();
        assert_eq!(report.instruction.result.get("sighash"), None);
    }

    #[test]
    fn test_inspect_account() {
        let candidates = [Candidate::new("mint", key(5).to_bytes())];
        let probe = inspect_account(&chain(), &key(6), &candidates, false).unwrap();
        assert_eq!(probe.result.get("mint"), Some(72));
        assert_eq!(probe.data.len(), probe.length);
    }

    #[test]
    fn test_buffer_probe_json_skips_raw_data() {
        let probe = BufferProbe::run("t", vec![1, 2, 3], &[Candidate::new("two", [2])], false);
        let json = serde_json::to_value(&probe).unwrap();
        assert!(json.get("data").is_none());
        assert!(json.get("occurrences").is_none());
        assert_eq!(json["result"][0]["offset"], 1);
    }

    #[test]
    fn test_buffer_probe_repeated_label_reported_once() {
        let candidates = [
            Candidate::new("one", [1]),
            Candidate::new("one", [2]),
        ];
        let probe = BufferProbe::run("t", vec![1, 2, 1], &candidates, true);

        assert_eq!(probe.result.len(), 1);
        assert_eq!(probe.result.get("one"), Some(0));
        assert_eq!(
            probe.occurrences,
            vec![Occurrences {
                label: "one".to_string(),
                offsets: vec![0, 2],
            }]
        );
    }
}
