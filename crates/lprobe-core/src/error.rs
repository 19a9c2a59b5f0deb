use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Instruction {0} not found in transaction")]
    InstructionNotFound(usize),

    #[error("Instruction {ix_index} has no account at position {position}")]
    AccountPositionNotFound { ix_index: usize, position: usize },

    #[error("Account key index {0} out of range")]
    AccountKeyNotFound(usize),

    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    #[error("Invalid byte pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if the remote node reported the requested object as missing
    pub fn is_missing_on_chain(&self) -> bool {
        matches!(
            self,
            Error::TransactionNotFound(_) | Error::AccountNotFound(_)
        )
    }
}

impl From<bs58::decode::Error> for Error {
    fn from(e: bs58::decode::Error) -> Self {
        Error::Decode(format!("base58: {}", e))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Decode(format!("base64: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_error_is_missing_on_chain() {
        assert!(Error::AccountNotFound("abc".to_string()).is_missing_on_chain());
        assert!(Error::TransactionNotFound("sig".to_string()).is_missing_on_chain());
        assert!(!Error::InstructionNotFound(0).is_missing_on_chain());
    }

    #[test]
    fn test_error_display() {
        let err = Error::AccountPositionNotFound {
            ix_index: 0,
            position: 7,
        };
        assert_eq!(err.to_string(), "Instruction 0 has no account at position 7");

        let err = Error::Rpc {
            code: -32602,
            message: "Invalid param".to_string(),
        };
        assert_eq!(err.to_string(), "RPC error -32602: Invalid param");
    }
}
