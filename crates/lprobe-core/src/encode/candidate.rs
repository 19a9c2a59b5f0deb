//! Typed candidate specifications (`label=kind:value`)

use std::str::FromStr;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::error::{Error, Result};
use crate::probe::Candidate;
use crate::pubkey::Pubkey;

/// How the textual value of a candidate is turned into bytes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CandidateKind {
    U64,
    I64,
    U32,
    U16,
    Pubkey,
    /// Instruction discriminator of the given instruction name
    Sighash,
    /// Account discriminator of the given account type name
    Account,
    Hex,
    Utf8,
    /// Unix seconds or RFC 3339, encoded as signed 64-bit
    Timestamp,
}

impl CandidateKind {
    /// Text is encoded byte for byte; every other kind ignores surrounding whitespace.
    pub fn encode(&self, value: &str) -> Result<Vec<u8>> {
        let trimmed = value.trim();
        let bytes = match self {
            Self::U64 => super::u64_le(parse_number(trimmed)?).to_vec(),
            Self::I64 => super::i64_le(parse_number(trimmed)?).to_vec(),
            Self::U32 => super::u32_le(parse_number(trimmed)?).to_vec(),
            Self::U16 => super::u16_le(parse_number(trimmed)?).to_vec(),
            Self::Pubkey => super::pubkey_bytes(&trimmed.parse::<Pubkey>()?).to_vec(),
            Self::Sighash => super::sighash(trimmed).to_vec(),
            Self::Account => super::account_discriminator(trimmed).to_vec(),
            Self::Hex => super::parse_hex(trimmed)?,
            Self::Utf8 => value.as_bytes().to_vec(),
            Self::Timestamp => super::i64_le(parse_timestamp(trimmed)?).to_vec(),
        };
        Ok(bytes)
    }
}

fn parse_number<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let cleaned = value.replace('_', "");
    cleaned
        .parse()
        .map_err(|e| Error::InvalidCandidate(format!("invalid number '{}': {}", value, e)))
}

/// Unix seconds, or an RFC 3339 date converted to Unix seconds
pub fn parse_timestamp(value: &str) -> Result<i64> {
    if let Ok(secs) = value.parse::<i64>() {
        return Ok(secs);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|e| Error::InvalidCandidate(format!("invalid timestamp '{}': {}", value, e)))
}

/// A candidate as written on the command line or in a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpec {
    pub label: String,
    pub kind: CandidateKind,
    pub value: String,
}

impl CandidateSpec {
    pub fn new(label: impl Into<String>, kind: CandidateKind, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            value: value.into(),
        }
    }

    pub fn to_candidate(&self) -> Result<Candidate> {
        let pattern = self.kind.encode(&self.value).map_err(|e| {
            Error::InvalidCandidate(format!("{} ({}): {}", self.label, self.kind, e))
        })?;
        Ok(Candidate::new(self.label.clone(), pattern))
    }
}

impl FromStr for CandidateSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (label, rest) = s.split_once('=').ok_or_else(|| {
            Error::InvalidCandidate(format!("expected label=kind:value, got '{}'", s))
        })?;
        let (kind, value) = rest.split_once(':').ok_or_else(|| {
            Error::InvalidCandidate(format!("expected kind:value after '=', got '{}'", rest))
        })?;

        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidCandidate(format!("empty label in '{}'", s)));
        }

        let kind = CandidateKind::from_str(kind.trim()).map_err(|_| {
            Error::InvalidCandidate(format!(
                "unknown kind '{}' (expected one of: {})",
                kind,
                CandidateKind::VARIANTS.join(", ")
            ))
        })?;

        Ok(Self::new(label, kind, value))
    }
}
