use log::info;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::error::Result;

/// One event from a transaction's submit-and-watch lifecycle stream.
///
/// `Finalized` and `Error` are terminal; everything else is progress
/// reporting carrying the latest known transaction hash.
#[derive(Debug, Clone)]
pub enum TxEvent {
    /// Transaction was broadcast to peers
    Broadcast { tx_hash: String },
    /// Transaction was included in a (not yet final) block
    InBlock { tx_hash: String },
    /// Transaction reached a finalized block. `ok` reports the in-runtime
    /// dispatch outcome; a finalized-but-failed transaction is still
    /// complete from the watcher's point of view.
    Finalized {
        tx_hash: String,
        ok: bool,
        dispatch_error: Option<String>,
    },
    /// The subscription stream itself errored
    Error { message: String },
}

impl TxEvent {
    /// Transaction hash carried by this event, if any.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            TxEvent::Broadcast { tx_hash }
            | TxEvent::InBlock { tx_hash }
            | TxEvent::Finalized { tx_hash, .. } => Some(tx_hash),
            TxEvent::Error { .. } => None,
        }
    }
}

/// A live subscription to one transaction's lifecycle events.
///
/// `unsubscribe` runs the cleanup hook at most once; dropping the
/// subscription without calling it runs the hook as well, so a watch can
/// never leak its upstream subscription.
pub struct TxSubscription {
    events: Receiver<TxEvent>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TxSubscription {
    pub fn new(events: Receiver<TxEvent>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            events,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Block for the next event until `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> std::result::Result<TxEvent, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    /// Detach from the upstream event source.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TxSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Capability to sign, submit, and watch one transaction.
///
/// Each call opens a fresh watch on the same already-submitted transaction
/// handle; the network-facing implementation lives outside this crate.
pub trait SubmitAndWatch {
    fn sign_submit_and_watch(&self, signer: &str) -> Result<TxSubscription>;
}

/// Read-only chain queries used by the fixed-interval polling helpers.
pub trait ChainQuery {
    /// Height of the current best block.
    fn best_block(&self) -> Result<u64>;
    /// Current nonce of an account.
    fn account_nonce(&self, address: &str) -> Result<u64>;
}

/// Explicit handle to the network connection capabilities.
///
/// Constructed once by the test harness and passed by reference to every
/// function that needs network access; `destroy` is the explicit teardown.
pub struct RpcContext {
    endpoint: String,
    query: Box<dyn ChainQuery + Send + Sync>,
}

impl RpcContext {
    pub fn new(endpoint: impl Into<String>, query: Box<dyn ChainQuery + Send + Sync>) -> Self {
        let endpoint = endpoint.into();
        info!("RPC context created for {endpoint}");
        Self { endpoint, query }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn query(&self) -> &dyn ChainQuery {
        self.query.as_ref()
    }

    /// Tear the context down. Consuming self makes any later use a compile
    /// error rather than a hidden reconnect.
    pub fn destroy(self) {
        info!("RPC context for {} destroyed", self.endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::channel;
    use std::sync::Arc;

    #[test]
    fn test_unsubscribe_runs_cleanup_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = channel();
        let counter = Arc::clone(&calls);
        let sub = TxSubscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_runs_cleanup_when_not_unsubscribed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = channel();
        let counter = Arc::clone(&calls);
        {
            let _sub = TxSubscription::new(rx, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_hash_accessor() {
        let event = TxEvent::InBlock {
            tx_hash: "0xabc".to_string(),
        };
        assert_eq!(event.tx_hash(), Some("0xabc"));
        let error = TxEvent::Error {
            message: "ws closed".to_string(),
        };
        assert_eq!(error.tx_hash(), None);
    }
}
