//! Layout map built from probe results
//!
//! Lays the found candidates out along the buffer and fills the space between
//! them with gaps, giving a first sketch of the record layout.

use serde::Serialize;

use super::ProbeResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Field {
        label: String,
        start: usize,
        end: usize,
        /// Starts before the previous field ended
        overlaps: bool,
    },
    Gap {
        start: usize,
        end: usize,
    },
}

impl Segment {
    pub fn start(&self) -> usize {
        match self {
            Segment::Field { start, .. } | Segment::Gap { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Segment::Field { end, .. } | Segment::Gap { end, .. } => *end,
        }
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutMap {
    pub buffer_len: usize,
    pub segments: Vec<Segment>,
}

impl LayoutMap {
    /// Build the map for a buffer of `buffer_len` bytes.
    ///
    /// Absent and zero-length entries are skipped. Fields are ordered by start
    /// offset (ties by candidate order).
    pub fn build(buffer_len: usize, result: &ProbeResult) -> Self {
        let mut found: Vec<(usize, usize, &str)> = result
            .entries()
            .iter()
            .filter(|e| e.pattern_len > 0)
            .filter_map(|e| Some((e.offset?, e.end()?, e.label.as_str())))
            .collect();
        found.sort_by_key(|&(start, _, _)| start);

        let mut segments = Vec::with_capacity(found.len() * 2 + 1);
        let mut cursor = 0usize;

        for (start, end, label) in found {
            if start > cursor {
                segments.push(Segment::Gap {
                    start: cursor,
                    end: start,
                });
            }
            segments.push(Segment::Field {
                label: label.to_string(),
                start,
                end,
                overlaps: start < cursor,
            });
            cursor = cursor.max(end);
        }

        if cursor < buffer_len {
            segments.push(Segment::Gap {
                start: cursor,
                end: buffer_len,
            });
        }

        Self {
            buffer_len,
            segments,
        }
    }

    /// Bytes not covered by any found field
    pub fn unexplained_bytes(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Gap { .. }))
            .map(Segment::len)
            .sum()
    }
}
