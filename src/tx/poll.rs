use log::debug;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{HarnessError, Result};
use crate::tx::client::RpcContext;

/// Fixed polling interval. These helpers poll deliberately: the chain
/// exposes no push-based event for best height or account nonces.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Wait until the best block advances by `count` from where it is now.
pub fn wait_for_blocks(ctx: &RpcContext, count: u64, timeout: Duration) -> Result<u64> {
    let start = ctx.query().best_block()?;
    let target = start + count;
    debug!("Waiting for best block {target} on {}", ctx.endpoint());

    let deadline = Instant::now() + timeout;
    loop {
        let best = ctx.query().best_block()?;
        if best >= target {
            return Ok(best);
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::Readiness(format!(
                "Best block reached only #{best} of #{target} within {timeout:?}"
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Wait until an account's nonce moves past its current value, returning
/// the new nonce.
pub fn wait_for_nonce_change(ctx: &RpcContext, address: &str, timeout: Duration) -> Result<u64> {
    let initial = ctx.query().account_nonce(address)?;
    debug!("Waiting for nonce of {address} to leave {initial}");

    let deadline = Instant::now() + timeout;
    loop {
        let nonce = ctx.query().account_nonce(address)?;
        if nonce != initial {
            return Ok(nonce);
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::Readiness(format!(
                "Nonce of {address} stayed at {initial} for {timeout:?}"
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
