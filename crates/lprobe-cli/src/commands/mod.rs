//! CLI command implementations.

pub mod account;
pub mod hexdump;
pub mod input;
pub mod probe;
pub mod sell;
pub mod sighash;

use std::path::PathBuf;

use anyhow::{Context, Result};
use lprobe_core::report::{TextReport, save_json, to_json};
use lprobe_core::{BufferProbe, InspectionReport, ReportConfig, RpcClient, RpcConfig};
use serde::Serialize;
use tracing::info;

/// How reports are written to stdout
#[derive(Clone)]
pub struct Output {
    json: bool,
    text: TextReport,
    save_to: Option<PathBuf>,
    pub all_occurrences: bool,
}

impl Output {
    pub fn new(json: bool, save_to: Option<PathBuf>, report: &ReportConfig) -> Self {
        Self {
            json,
            text: TextReport::new(report.color, report.hexdump),
            save_to,
            all_occurrences: report.all_occurrences,
        }
    }

    pub fn with_hexdump(mut self, enabled: bool) -> Self {
        self.text.hexdump = self.text.hexdump || enabled;
        self
    }

    pub fn buffer(&self, probe: &BufferProbe) -> Result<()> {
        self.save(probe)?;
        if self.json {
            println!("{}", to_json(probe)?);
        } else {
            print!("{}", self.text.render_buffer(probe));
        }
        Ok(())
    }

    pub fn inspection(&self, report: &InspectionReport) -> Result<()> {
        self.save(report)?;
        if self.json {
            println!("{}", to_json(report)?);
        } else {
            print!("{}", self.text.render_inspection(report));
        }
        Ok(())
    }

    fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(path) = &self.save_to {
            save_json(value, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        Ok(())
    }
}

pub fn rpc_client(config: &RpcConfig) -> RpcClient {
    RpcClient::new(config.url.clone()).with_retries(config.max_retries, config.initial_backoff_ms)
}
