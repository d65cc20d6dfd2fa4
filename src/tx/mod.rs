//! Transaction submission and finalization tracking
//!
//! This module drives a submitted transaction's lifecycle stream to a
//! terminal outcome, retries transient subscription failures up to a bound,
//! and offers fixed-interval polling helpers for chain values that have no
//! push-based signal.

pub mod client;
pub mod poll;
pub mod submitter;
pub mod watcher;

pub use client::{ChainQuery, RpcContext, SubmitAndWatch, TxEvent, TxSubscription};
pub use poll::{wait_for_blocks, wait_for_nonce_change, POLL_INTERVAL};
pub use submitter::{
    wait_for_transaction_with_retry, wait_for_transaction_with_retry_config, MAX_RETRIES,
    RETRY_BACKOFF,
};
pub use watcher::{
    wait_for_transaction_completion, wait_for_transaction_completion_within, TX_TIMEOUT,
};
