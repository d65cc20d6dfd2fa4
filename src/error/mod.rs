//! Error handling for the testnet harness
//!
//! This module provides comprehensive error types for all harness operations.

use std::fmt;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Comprehensive error types for harness operations
#[derive(Debug, Clone)]
pub enum HarnessError {
    /// Chain-spec generation failed (non-zero exit from the node binary)
    SpecGeneration { stderr: String, code: Option<i32> },
    /// The intermediate chain-spec document could not be parsed
    MalformedSpec(String),
    /// Node process spawn/termination errors
    Process(String),
    /// File I/O errors
    Io(String),
    /// A readiness condition was not observed in time
    Readiness(String),
    /// Transaction subscription errors (stream error or terminal timeout)
    Subscription(String),
    /// Transaction watch retries exhausted
    RetryExhausted { label: String, attempts: usize },
    /// Keystore seeding errors
    Key(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::SpecGeneration { stderr, code } => {
                write!(
                    f,
                    "Chain spec generation failed (exit code {code:?}): {stderr}"
                )
            }
            HarnessError::MalformedSpec(msg) => write!(f, "Malformed chain spec: {msg}"),
            HarnessError::Process(msg) => write!(f, "Process error: {msg}"),
            HarnessError::Io(msg) => write!(f, "I/O error: {msg}"),
            HarnessError::Readiness(msg) => write!(f, "Readiness error: {msg}"),
            HarnessError::Subscription(msg) => write!(f, "Subscription error: {msg}"),
            HarnessError::RetryExhausted { label, attempts } => {
                write!(f, "Transaction {label} failed after {attempts} attempts")
            }
            HarnessError::Key(msg) => write!(f, "Keystore error: {msg}"),
            HarnessError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::MalformedSpec(err.to_string())
    }
}
