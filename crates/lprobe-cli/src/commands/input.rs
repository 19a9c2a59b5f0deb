//! Local buffer input (`--hex` or `--file`).

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct BufferInput {
    /// Buffer as hex, e.g. "33 e6 85 a4" or "0x33e685a4"
    #[arg(long)]
    pub hex: Option<String>,

    /// Read the buffer from a binary file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl BufferInput {
    pub fn load(&self) -> Result<Vec<u8>> {
        if let Some(hex) = &self.hex {
            return lprobe_core::parse_hex(hex).context("Failed to parse --hex buffer");
        }
        if let Some(path) = &self.file {
            return fs::read(path).with_context(|| format!("Failed to read {}", path.display()));
        }
        anyhow::bail!("No buffer specified. Use --hex or --file")
    }

    pub fn describe(&self) -> String {
        match (&self.hex, &self.file) {
            (_, Some(path)) => path.display().to_string(),
            _ => "hex buffer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_hex() {
        let input = BufferInput {
            hex: Some("0x01 02".to_string()),
            file: None,
        };
        assert_eq!(input.load().unwrap(), vec![1, 2]);
        assert_eq!(input.describe(), "hex buffer");
    }

    #[test]
    fn test_load_invalid_hex() {
        let input = BufferInput {
            hex: Some("zz".to_string()),
            file: None,
        };
        assert!(input.load().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let input = BufferInput {
            hex: None,
            file: Some(PathBuf::from("/nonexistent/lprobe/buffer.bin")),
        };
        let err = input.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
