//! Layout prober for opaque byte buffers
//!
//! Locates known byte patterns (a price, a public key, a discriminator) inside
//! a raw instruction payload or account blob so a human can guess at an
//! undocumented layout. Offsets are hints, not a decoded schema.

mod layout;

use std::collections::HashSet;

use memchr::memmem;
use serde::Serialize;
use tracing::warn;

pub use layout::{LayoutMap, Segment};

/// A labelled byte pattern that may appear verbatim inside a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub pattern: Vec<u8>,
}

impl Candidate {
    pub fn new(label: impl Into<String>, pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// Outcome for a single candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeEntry {
    pub label: String,
    pub pattern_len: usize,
    /// Lowest offset the pattern starts at, `None` when absent
    pub offset: Option<usize>,
}

impl ProbeEntry {
    /// End of the matched range (exclusive), if found
    pub fn end(&self) -> Option<usize> {
        self.offset.map(|o| o + self.pattern_len)
    }
}

/// One offset per distinct label, in the order the labels were first given.
///
/// Serializes as a JSON array of entries; a label never appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProbeResult {
    entries: Vec<ProbeEntry>,
}

impl ProbeResult {
    /// Offset reported for `label`.
    ///
    /// Returns `None` both when the label is unknown and when the pattern was
    /// not found; use [`ProbeResult::entry`] to tell the two apart.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entry(label).and_then(|e| e.offset)
    }

    pub fn entry(&self, label: &str) -> Option<&ProbeEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn entries(&self) -> &[ProbeEntry] {
        &self.entries
    }

    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|e| e.offset.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Candidates with a label already used earlier in the list are skipped
pub fn unique_candidates(candidates: &[Candidate]) -> impl Iterator<Item = &Candidate> {
    let mut seen = HashSet::new();
    candidates.iter().filter(move |c| {
        let first = seen.insert(c.label.as_str());
        if !first {
            warn!("Ignoring repeated candidate label '{}'", c.label);
        }
        first
    })
}

/// Report the first offset of each candidate pattern inside `buffer`.
///
/// Each candidate is searched independently with an exact, unaligned
/// sub-sequence match. An empty pattern matches at offset 0; a pattern longer
/// than the buffer never matches. When a label repeats, only its first
/// candidate is searched.
pub fn probe(buffer: &[u8], candidates: &[Candidate]) -> ProbeResult {
    let entries = unique_candidates(candidates)
        .map(|c| ProbeEntry {
            label: c.label.clone(),
            pattern_len: c.pattern.len(),
            offset: find_first(buffer, &c.pattern),
        })
        .collect();

    ProbeResult { entries }
}

/// Lowest index at which `pattern` occurs in `buffer`
pub fn find_first(buffer: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    if pattern.len() > buffer.len() {
        return None;
    }
    memmem::find(buffer, pattern)
}

/// Every index at which `pattern` occurs, ascending, overlapping matches included.
///
/// An empty pattern yields `[0]`.
pub fn occurrences(buffer: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() {
        return vec![0];
    }
    buffer
        .windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(pos, _)| pos)
        .collect()
}
