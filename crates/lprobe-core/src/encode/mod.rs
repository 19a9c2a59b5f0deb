//! Turn domain values into candidate byte patterns

mod candidate;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::pubkey::Pubkey;

pub use candidate::{CandidateKind, CandidateSpec, parse_timestamp};

/// Length of an instruction or account discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

pub fn u64_le(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

pub fn i64_le(value: i64) -> [u8; 8] {
    value.to_le_bytes()
}

pub fn u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

pub fn pubkey_bytes(key: &Pubkey) -> [u8; 32] {
    key.to_bytes()
}

/// Concatenate little-endian encodings of consecutive u64 fields
pub fn merge_u64_le(values: &[u64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Instruction discriminator: first 8 bytes of `sha256("global:" + name)`
pub fn sighash(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("global", name)
}

/// Account discriminator: first 8 bytes of `sha256("account:" + name)`
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_hash("account", name)
}

fn namespaced_hash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Parse a hex byte string such as `"0A FF 10"`, `"0aff10"` or `"0x0aff10"`.
///
/// Whitespace between bytes is optional. Wildcards are not accepted.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: Vec<char> = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(Error::InvalidPattern(format!(
            "odd number of hex digits in '{}'",
            text
        )));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let token: String = pair.iter().collect();
            u8::from_str_radix(&token, 16).map_err(|e| {
                Error::InvalidPattern(format!("invalid hex byte '{}': {}", token, e))
            })
        })
        .collect()
}

/// Format bytes as space-separated upper-case hex
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
