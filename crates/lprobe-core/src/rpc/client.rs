use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::ChainSource;
use super::wire::{AccountInfoResult, EncodedTransaction, RpcRequest, RpcResponse};
use crate::error::{Error, Result};
use crate::pubkey::Pubkey;
use crate::transaction::{AccountView, TransactionView};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF_MS: u64 = 5000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Retry bookkeeping for a single RPC call
struct RetryState {
    attempt: u32,
    backoff_ms: u64,
    max_retries: u32,
}

impl RetryState {
    fn new(max_retries: u32, initial_backoff_ms: u64) -> Self {
        Self {
            attempt: 0,
            backoff_ms: initial_backoff_ms,
            max_retries,
        }
    }

    fn can_retry(&self) -> bool {
        self.attempt < self.max_retries.saturating_sub(1)
    }

    fn increment(&mut self) {
        self.attempt += 1;
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }

    fn wait(&self) {
        if self.backoff_ms > 0 {
            thread::sleep(Duration::from_millis(self.backoff_ms));
        }
    }
}

/// Rate limits, server errors and transport hiccups are worth another attempt
fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::StatusCode(code) => *code == 429 || (500..600).contains(code),
        ureq::Error::Timeout(_) | ureq::Error::Io(_) => true,
        _ => false,
    }
}

/// Blocking JSON-RPC client for a chain node
#[derive(Clone)]
pub struct RpcClient {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
    max_retries: u32,
    initial_backoff_ms: u64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .build();
        let agent: ureq::Agent = config.into();

        Self {
            agent,
            url: url.into(),
            user_agent: format!("lprobe/{}", env!("CARGO_PKG_VERSION")),
            max_retries: MAX_RETRIES,
            initial_backoff_ms: INITIAL_BACKOFF_MS,
        }
    }

    /// Override the retry budget (attempts in total, at least one)
    pub fn with_retries(mut self, max_retries: u32, initial_backoff_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = RpcRequest::new(1, method, params);
        debug!("RPC {} -> {}", method, self.url);

        let response: RpcResponse<T> = self.with_retry(method, || {
            let mut resp = self
                .agent
                .post(&self.url)
                .header("User-Agent", &self.user_agent)
                .send_json(&request)?;
            resp.body_mut().read_json::<RpcResponse<T>>()
        })?;

        response.into_result()
    }

    /// Execute a request with retry logic
    fn with_retry<T, F>(&self, method: &str, mut request_fn: F) -> Result<T>
    where
        F: FnMut() -> std::result::Result<T, ureq::Error>,
    {
        let mut state = RetryState::new(self.max_retries, self.initial_backoff_ms);

        loop {
            match request_fn() {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) && state.can_retry() => {
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {}ms",
                        method,
                        state.attempt + 1,
                        state.max_retries,
                        e,
                        state.backoff_ms
                    );
                    state.wait();
                    state.increment();
                }
                Err(e) => return Err(Error::Http(format!("{}: {}", method, e))),
            }
        }
    }
}

impl ChainSource for RpcClient {
    fn get_transaction(&self, signature: &str) -> Result<TransactionView> {
        let params = json!([
            signature,
            {"encoding": "json", "maxSupportedTransactionVersion": 0}
        ]);
        let tx: EncodedTransaction = self
            .call("getTransaction", params)?
            .ok_or_else(|| Error::TransactionNotFound(signature.to_string()))?;

        let view = tx.into_view(signature)?;
        debug!(
            "Fetched transaction {} (slot {}, {} instructions, {} keys)",
            view.signature,
            view.slot,
            view.instructions.len(),
            view.account_keys.len()
        );
        Ok(view)
    }

    fn get_account(&self, address: &Pubkey) -> Result<AccountView> {
        let params = json!([address.to_string(), {"encoding": "base64"}]);
        let result: AccountInfoResult = self
            .call("getAccountInfo", params)?
            .ok_or_else(|| Error::AccountNotFound(address.to_string()))?;

        let account = result
            .value
            .ok_or_else(|| Error::AccountNotFound(address.to_string()))?
            .into_view(*address, result.context.slot)?;
        debug!(
            "Fetched account {} ({} bytes, owner {})",
            address,
            account.data.len(),
            account.owner
        );
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn client() -> RpcClient {
        RpcClient::new("http://127.0.0.1:8899").with_retries(3, 0)
    }

    #[test]
    fn test_retry_state_backoff_doubles_and_caps() {
        let mut state = RetryState::new(10, 100);
        state.increment();
        assert_eq!(state.backoff_ms, 200);
        for _ in 0..10 {
            state.increment();
        }
        assert_eq!(state.backoff_ms, MAX_BACKOFF_MS);
    }

    #[test]
    fn test_retry_state_budget() {
        let mut state = RetryState::new(3, 0);
        assert!(state.can_retry());
        state.increment();
        assert!(state.can_retry());
        state.increment();
        assert!(!state.can_retry());
    }

    #[test]
    fn test_is_transient() {
        assert!(is_transient(&ureq::Error::StatusCode(429)));
        assert!(is_transient(&ureq::Error::StatusCode(503)));
        assert!(!is_transient(&ureq::Error::StatusCode(404)));
        assert!(is_transient(&ureq::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset"
        ))));
    }

    #[test]
    fn test_with_retry_recovers_from_transient_error() {
        let calls = Cell::new(0);
        let result = client().with_retry("getSlot", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(ureq::Error::StatusCode(503))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_with_retry_gives_up_after_budget() {
        let calls = Cell::new(0);
        let result: Result<u32> = client().with_retry("getSlot", || {
            calls.set(calls.get() + 1);
            Err(ureq::Error::StatusCode(429))
        });
        assert!(matches!(result, Err(Error::Http(_))));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_with_retry_does_not_retry_client_errors() {
        let calls = Cell::new(0);
        let result: Result<u32> = client().with_retry("getSlot", || {
            calls.set(calls.get() + 1);
            Err(ureq::Error::StatusCode(400))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_with_retries_minimum_one_attempt() {
        let client = RpcClient::new("http://localhost").with_retries(0, 0);
        assert_eq!(client.max_retries, 1);
        assert_eq!(client.url(), "http://localhost");
    }
}
