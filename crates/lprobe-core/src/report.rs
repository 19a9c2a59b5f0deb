//! Text and JSON rendering of probe results
//!
//! Offsets printed here are diagnostic guesses about an undocumented layout,
//! not decoded fields.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::error::Result;
use crate::inspect::{BufferProbe, InspectionReport};
use crate::probe::{ProbeEntry, Segment};

const DISCLAIMER: &str = "offsets are guesses from value matching, not a decoded schema";

/// Plain-text renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReport {
    pub color: bool,
    pub hexdump: bool,
}

impl TextReport {
    pub fn new(color: bool, hexdump: bool) -> Self {
        Self { color, hexdump }
    }

    pub fn render_inspection(&self, report: &InspectionReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Transaction {}", report.signature);
        let _ = writeln!(out, "  slot:          {}", report.slot);
        if let Some(time) = &report.block_time {
            let _ = writeln!(out, "  block time:    {}", time);
        }
        let _ = writeln!(out, "  program:       {}", report.program_id);
        let _ = writeln!(out, "  escrow:        {}", report.escrow);
        let _ = writeln!(out, "  seller:        {}", report.keys.seller);
        let _ = writeln!(out, "  token account: {}", report.keys.token_account);
        let _ = writeln!(out, "  mint:          {}", report.keys.mint);
        let _ = writeln!(out, "  ({})", self.dim(DISCLAIMER));
        out.push('\n');
        out.push_str(&self.buffer_section(&report.instruction, false));
        out.push('\n');
        out.push_str(&self.buffer_section(&report.escrow_state, false));
        out
    }

    /// Standalone buffer report, headed by the disclaimer line
    pub fn render_buffer(&self, probe: &BufferProbe) -> String {
        self.buffer_section(probe, true)
    }

    fn buffer_section(&self, probe: &BufferProbe, disclaimer: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}, length {} bytes", self.bold(&probe.title), probe.length);
        if disclaimer {
            let _ = writeln!(out, "  ({})", self.dim(DISCLAIMER));
        }

        let width = probe
            .result
            .entries()
            .iter()
            .map(|e| e.label.len())
            .max()
            .unwrap_or(0);
        for entry in probe.result.entries() {
            let _ = writeln!(out, "  {}", self.entry_line(entry, width));
        }

        for occ in &probe.occurrences {
            if occ.offsets.len() > 1 {
                let offsets: Vec<String> = occ.offsets.iter().map(|o| o.to_string()).collect();
                let _ = writeln!(
                    out,
                    "  {:width$}  seen {} times at {}",
                    occ.label,
                    occ.offsets.len(),
                    offsets.join(", "),
                    width = width
                );
            }
        }

        if !probe.layout.segments.is_empty() {
            let _ = writeln!(out, "  layout:");
            for segment in &probe.layout.segments {
                let _ = writeln!(out, "    {}", self.segment_line(segment));
            }
        }

        if self.hexdump && !probe.data.is_empty() {
            out.push('\n');
            out.push_str(&hexdump(&probe.data, true));
        }

        out
    }

    fn entry_line(&self, entry: &ProbeEntry, width: usize) -> String {
        match entry.offset {
            Some(offset) => format!(
                "{:width$}  {} (0x{:X}), {} bytes",
                entry.label,
                self.found(&offset.to_string()),
                offset,
                entry.pattern_len,
                width = width
            ),
            None => format!(
                "{:width$}  {}",
                entry.label,
                self.missing("not found"),
                width = width
            ),
        }
    }

    fn segment_line(&self, segment: &Segment) -> String {
        match segment {
            Segment::Field {
                label,
                start,
                end,
                overlaps,
            } => {
                let suffix = if *overlaps { " (overlaps previous)" } else { "" };
                format!("[{:4}..{:4}) {}{}", start, end, label, suffix)
            }
            Segment::Gap { start, end } => format!(
                "[{:4}..{:4}) {}",
                start,
                end,
                self.dim(&format!("?? {} bytes", end - start))
            ),
        }
    }

    fn found(&self, s: &str) -> String {
        if self.color {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    fn missing(&self, s: &str) -> String {
        if self.color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Save a report as pretty JSON
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    fs::write(path, to_json(value)?)?;
    Ok(())
}

/// Traditional hexdump, 16 bytes per row split after 8.
///
/// ```text
/// 0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
/// ```
pub fn hexdump(bytes: &[u8], ascii: bool) -> String {
    let mut out = String::new();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "0x{:03X}: ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                out.push(' ');
            }
            let _ = write!(out, "{:02X} ", byte);
        }

        // Padding for incomplete lines
        for j in chunk.len()..16 {
            if j == 8 {
                out.push(' ');
            }
            out.push_str("   ");
        }

        if ascii {
            out.push_str(" |");
            for byte in chunk {
                if (0x20..0x7F).contains(byte) {
                    out.push(*byte as char);
                } else {
                    out.push('.');
                }
            }
            for _ in chunk.len()..16 {
                out.push(' ');
            }
            out.push('|');
        }

        // Trailing spaces only come from the hex column when ascii is off
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::ResolvedKeys;
    use crate::probe::Candidate;
    use crate::pubkey::Pubkey;
    use tempfile::tempdir;

    fn sample_probe() -> BufferProbe {
        BufferProbe::run(
            "Escrow state data",
            vec![0xAA, 0xBB, 0x01, 0x00, 0xCC],
            &[
                Candidate::new("one", [0x01, 0x00]),
                Candidate::new("absent", [0x99]),
            ],
            false,
        )
    }

    #[test]
    fn test_render_buffer_plain() {
        let text = TextReport::new(false, false).render_buffer(&sample_probe());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Escrow state data, length 5 bytes");
        assert_eq!(lines[1], format!("  ({})", DISCLAIMER));
        assert_eq!(lines[2], "  one     2 (0x2), 2 bytes");
        assert_eq!(lines[3], "  absent  not found");
        assert_eq!(lines[4], "  layout:");
        assert_eq!(lines[5], "    [   0..   2) ?? 2 bytes");
        assert_eq!(lines[6], "    [   2..   4) one");
        assert_eq!(lines[7], "    [   4..   5) ?? 1 bytes");
    }

    #[test]
    fn test_render_inspection_states_disclaimer_once() {
        let report = InspectionReport {
            signature: "sig".to_string(),
            slot: 7,
            block_time: None,
            program_id: Pubkey::new([3; 32]),
            escrow: Pubkey::new([6; 32]),
            keys: ResolvedKeys {
                seller: Pubkey::new([1; 32]),
                token_account: Pubkey::new([2; 32]),
                mint: Pubkey::new([4; 32]),
            },
            instruction: sample_probe(),
            escrow_state: sample_probe(),
        };
        let text = TextReport::new(false, false).render_inspection(&report);

        assert!(text.starts_with("Transaction sig\n"));
        assert_eq!(text.matches(DISCLAIMER).count(), 1);
        assert_eq!(text.matches("Escrow state data, length 5 bytes").count(), 2);
    }

    #[test]
    fn test_render_buffer_color_adds_escapes() {
        let plain = TextReport::new(false, false).render_buffer(&sample_probe());
        let colored = TextReport::new(true, false).render_buffer(&sample_probe());
        assert!(!plain.contains('\x1b'));
        assert!(colored.contains('\x1b'));
    }

    #[test]
    fn test_render_buffer_with_hexdump() {
        let text = TextReport::new(false, true).render_buffer(&sample_probe());
        assert!(text.contains("0x000: AA BB 01 00 CC"));
    }

    #[test]
    fn test_hexdump_full_row() {
        let dump = hexdump(b"Hello World\0\0\0\0\0", true);
        assert_eq!(
            dump,
            "0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|\n"
        );
    }

    #[test]
    fn test_hexdump_partial_row_padding() {
        let dump = hexdump(&[0x41, 0x42], true);
        let expected = format!("0x000: 41 42 {}  |AB{}|\n", "   ".repeat(14), " ".repeat(14));
        assert_eq!(dump, expected);
    }

    #[test]
    fn test_hexdump_without_ascii() {
        let dump = hexdump(&[0u8; 17], false);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "0x010: 00");
        assert!(hexdump(&[], false).is_empty());
    }

    #[test]
    fn test_save_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        save_json(&sample_probe(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["length"], 5);
        assert_eq!(value["layout"]["segments"][1]["kind"], "field");
    }
}
