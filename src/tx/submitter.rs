use log::{info, warn};
use std::thread;
use std::time::Duration;

use crate::error::{HarnessError, Result};
use crate::tx::client::SubmitAndWatch;
use crate::tx::watcher::{wait_for_transaction_completion_within, TX_TIMEOUT};

/// Default bound on watch attempts per transaction
pub const MAX_RETRIES: usize = 5;
/// Fixed delay between failed attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Drive a transaction to finalization, retrying failed watches up to the
/// default bound.
pub fn wait_for_transaction_with_retry(
    tx: &dyn SubmitAndWatch,
    signer: &str,
    label: &str,
    max_retries: usize,
) -> Result<()> {
    wait_for_transaction_with_retry_config(tx, signer, label, max_retries, RETRY_BACKOFF, TX_TIMEOUT)
}

/// Retry loop around the finalization watcher.
///
/// Each attempt opens a fresh watch on the same already-submitted
/// transaction handle, so retries only compensate for subscription-level
/// flakiness; a submission rejected at the RPC layer fails identically on
/// every attempt. Intermediate failures are logged and recovered locally,
/// and only exhaustion escalates.
pub fn wait_for_transaction_with_retry_config(
    tx: &dyn SubmitAndWatch,
    signer: &str,
    label: &str,
    max_retries: usize,
    backoff: Duration,
    watch_timeout: Duration,
) -> Result<()> {
    for attempt in 1..=max_retries {
        match wait_for_transaction_completion_within(tx, signer, label, watch_timeout) {
            Ok(()) => {
                info!("Transaction {label} completed on attempt {attempt}/{max_retries}");
                return Ok(());
            }
            Err(e) => {
                warn!("Attempt {attempt}/{max_retries} for {label} failed: {e}");
                // No backoff after the final failure; the loop exits instead.
                if attempt < max_retries {
                    thread::sleep(backoff);
                }
            }
        }
    }

    Err(HarnessError::RetryExhausted {
        label: label.to_string(),
        attempts: max_retries,
    })
}
