use log::{debug, info, warn};
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use crate::error::{HarnessError, Result};
use crate::tx::client::{SubmitAndWatch, TxEvent};

/// Default window for a transaction to reach a terminal event
pub const TX_TIMEOUT: Duration = Duration::from_secs(5);

/// Drive one transaction watch to completion with the default timeout.
pub fn wait_for_transaction_completion(
    tx: &dyn SubmitAndWatch,
    signer: &str,
    label: &str,
) -> Result<()> {
    wait_for_transaction_completion_within(tx, signer, label, TX_TIMEOUT)
}

/// Subscribe to the transaction's lifecycle stream and block until it
/// settles.
///
/// Resolves on the first `Finalized` event regardless of the in-runtime
/// dispatch outcome; a dispatch error is logged, not escalated, because
/// the retry layer above cannot distinguish "logic rejected" from "not yet
/// included". Rejects on a stream error, a closed stream, or the timeout.
/// Every exit path unsubscribes before settling.
pub fn wait_for_transaction_completion_within(
    tx: &dyn SubmitAndWatch,
    signer: &str,
    label: &str,
    timeout: Duration,
) -> Result<()> {
    let subscription = tx.sign_submit_and_watch(signer)?;
    let deadline = Instant::now() + timeout;
    let mut last_hash = String::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            subscription.unsubscribe();
            return Err(timeout_error(label, &last_hash, timeout));
        }

        match subscription.recv_timeout(remaining) {
            Ok(TxEvent::Finalized {
                tx_hash,
                ok,
                dispatch_error,
            }) => {
                if ok {
                    info!("Transaction {label} ({tx_hash}) finalized");
                } else {
                    warn!(
                        "Transaction {label} ({tx_hash}) finalized with dispatch error: {}",
                        dispatch_error.as_deref().unwrap_or("unknown")
                    );
                }
                subscription.unsubscribe();
                return Ok(());
            }
            Ok(TxEvent::Error { message }) => {
                subscription.unsubscribe();
                return Err(HarnessError::Subscription(format!(
                    "Stream error while watching {label}: {message}"
                )));
            }
            Ok(event) => {
                if let Some(hash) = event.tx_hash() {
                    last_hash = hash.to_string();
                }
                debug!("Transaction {label} progress: {event:?}");
            }
            Err(RecvTimeoutError::Timeout) => {
                subscription.unsubscribe();
                return Err(timeout_error(label, &last_hash, timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                subscription.unsubscribe();
                return Err(HarnessError::Subscription(format!(
                    "Event stream for {label} closed before a terminal event"
                )));
            }
        }
    }
}

fn timeout_error(label: &str, last_hash: &str, timeout: Duration) -> HarnessError {
    let hash = if last_hash.is_empty() {
        "no hash seen"
    } else {
        last_hash
    };
    HarnessError::Subscription(format!(
        "Transaction {label} ({hash}) saw no terminal event within {timeout:?}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::client::TxSubscription;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{channel, Sender};
    use std::sync::{Arc, Mutex};

    /// Mock transaction handle scripting a fixed event sequence per watch.
    struct MockTx {
        script: Mutex<Vec<Vec<TxEvent>>>,
        unsubscribe_calls: Arc<AtomicUsize>,
        /// Keeps senders alive so streams go silent instead of disconnecting.
        parked_senders: Mutex<Vec<Sender<TxEvent>>>,
        hold_open: bool,
    }

    impl MockTx {
        fn new(script: Vec<Vec<TxEvent>>, hold_open: bool) -> Self {
            Self {
                script: Mutex::new(script),
                unsubscribe_calls: Arc::new(AtomicUsize::new(0)),
                parked_senders: Mutex::new(Vec::new()),
                hold_open,
            }
        }
    }

    impl SubmitAndWatch for MockTx {
        fn sign_submit_and_watch(&self, _signer: &str) -> Result<TxSubscription> {
            let events = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    Vec::new()
                } else {
                    script.remove(0)
                }
            };

            let (tx, rx) = channel();
            for event in events {
                let _ = tx.send(event);
            }
            if self.hold_open {
                self.parked_senders.lock().unwrap().push(tx);
            }

            let calls = Arc::clone(&self.unsubscribe_calls);
            Ok(TxSubscription::new(rx, move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }))
        }
    }

    fn finalized(ok: bool) -> TxEvent {
        TxEvent::Finalized {
            tx_hash: "0xabc".to_string(),
            ok,
            dispatch_error: if ok {
                None
            } else {
                Some("BadOrigin".to_string())
            },
        }
    }

    #[test]
    fn test_resolves_on_finalized() {
        let mock = MockTx::new(vec![vec![finalized(true)]], false);
        let result = wait_for_transaction_completion(&mock, "//Alice", "transfer");
        assert!(result.is_ok());
        assert_eq!(mock.unsubscribe_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolves_even_when_dispatch_failed() {
        let mock = MockTx::new(vec![vec![finalized(false)]], false);
        let result = wait_for_transaction_completion(&mock, "//Alice", "transfer");
        assert!(result.is_ok());
    }

    #[test]
    fn test_times_out_on_non_terminal_events_and_unsubscribes_once() {
        let mock = MockTx::new(
            vec![vec![TxEvent::Broadcast {
                tx_hash: "0xabc".to_string(),
            }]],
            true,
        );
        let err = wait_for_transaction_completion_within(
            &mock,
            "//Alice",
            "transfer",
            Duration::from_millis(100),
        )
        .expect_err("must time out");

        assert!(matches!(err, HarnessError::Subscription(_)));
        // Diagnostic message carries the last seen hash.
        assert!(err.to_string().contains("0xabc"));
        assert_eq!(mock.unsubscribe_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rejects_on_stream_error() {
        let mock = MockTx::new(
            vec![vec![TxEvent::Error {
                message: "websocket dropped".to_string(),
            }]],
            true,
        );
        let err = wait_for_transaction_completion(&mock, "//Alice", "transfer")
            .expect_err("stream error must reject");
        assert!(err.to_string().contains("websocket dropped"));
        assert_eq!(mock.unsubscribe_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rejects_on_closed_stream() {
        // No events and the sender is dropped immediately.
        let mock = MockTx::new(vec![Vec::new()], false);
        let err = wait_for_transaction_completion(&mock, "//Alice", "transfer")
            .expect_err("closed stream must reject");
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_progress_events_do_not_settle() {
        let mock = MockTx::new(
            vec![vec![
                TxEvent::Broadcast {
                    tx_hash: "0x01".to_string(),
                },
                TxEvent::InBlock {
                    tx_hash: "0x02".to_string(),
                },
                finalized(true),
            ]],
            false,
        );
        assert!(wait_for_transaction_completion(&mock, "//Alice", "transfer").is_ok());
        assert_eq!(mock.unsubscribe_calls.load(Ordering::SeqCst), 1);
    }
}
