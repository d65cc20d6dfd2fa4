use log::{debug, info};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::error::{HarnessError, Result};
use crate::node::process::Node;

/// Default timeout for the node's first idle line
pub const START_TIMEOUT: Duration = Duration::from_secs(60);
/// Default timeout for reaching a peer count
pub const PEERS_TIMEOUT: Duration = Duration::from_secs(60);
/// Default timeout for reaching a finalized height. Finalization is
/// inherently slower and must tolerate test-network warm-up.
pub const FINALIZED_TIMEOUT: Duration = Duration::from_secs(600);

/// Substring the node binary emits once it reaches its idle/ready loop
const IDLE_MARKER: &str = "Idle";

/// Wait until the node prints its first idle line.
pub fn ensure_started(node: &Node, timeout: Duration) -> Result<()> {
    info!("Waiting for node {} to start", node.name());
    ensure_line(node, "start", timeout, |line| line.contains(IDLE_MARKER))
}

/// Wait until the node reports at least `count` connected peers.
pub fn ensure_peer_count(node: &Node, count: u64, timeout: Duration) -> Result<()> {
    info!("Waiting for node {} to reach {count} peers", node.name());
    ensure_line(node, &format!("reach {count} peers"), timeout, |line| {
        extract_peer_count(line).is_some_and(|peers| peers >= count)
    })
}

/// Wait until the node reports a finalized height of at least `height`.
pub fn ensure_finalized_blocks(node: &Node, height: u64, timeout: Duration) -> Result<()> {
    info!(
        "Waiting for node {} to finalize block #{height}",
        node.name()
    );
    ensure_line(node, &format!("finalize block #{height}"), timeout, |line| {
        extract_finalized_height(line).is_some_and(|finalized| finalized >= height)
    })
}

/// Core readiness primitive: block on the node's line stream until a line
/// satisfies the matcher, or fail when the deadline passes.
///
/// Returning (either way) drops the line receiver, which detaches the
/// subscription: resolution and timeout are mutually exclusive and each
/// settles the watch exactly once.
fn ensure_line(
    node: &Node,
    condition: &str,
    timeout: Duration,
    matcher: impl FnMut(&str) -> bool,
) -> Result<()> {
    let rx = node.subscribe_output();
    wait_for_line(&rx, timeout, matcher).map_err(|reason| {
        HarnessError::Readiness(format!(
            "Node {} failed to {condition} in time: {reason} (last output: {})",
            node.name(),
            node.last_output()
        ))
    })
}

/// Process-agnostic half of the watch: anything that can feed lines into a
/// channel can drive a readiness condition.
fn wait_for_line(
    rx: &Receiver<String>,
    timeout: Duration,
    mut matcher: impl FnMut(&str) -> bool,
) -> std::result::Result<(), String> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(format!("no matching line within {timeout:?}"));
        }
        match rx.recv_timeout(remaining) {
            Ok(line) => {
                debug!("watch line: {line}");
                if matcher(&line) {
                    return Ok(());
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(format!("no matching line within {timeout:?}"));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err("output stream closed".to_string());
            }
        }
    }
}

/// Extract the peer count from an `Idle (<N> peers)` line.
fn extract_peer_count(line: &str) -> Option<u64> {
    let rest = line.split("Idle (").nth(1)?;
    let digits = rest.split(" peers").next()?;
    digits.trim().parse().ok()
}

/// Extract the height from a `finalized #<N>` line.
fn extract_finalized_height(line: &str) -> Option<u64> {
    let rest = line.split("finalized #").nth(1)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::thread;

    #[test]
    fn test_extract_peer_count() {
        assert_eq!(
            extract_peer_count("2024-01-01 12:00:00 💤 Idle (3 peers), best: #12"),
            Some(3)
        );
        assert_eq!(extract_peer_count("Idle (0 peers)"), Some(0));
        assert_eq!(extract_peer_count("Syncing, target=#100"), None);
        assert_eq!(extract_peer_count("Idle (peers)"), None);
    }

    #[test]
    fn test_extract_finalized_height() {
        assert_eq!(
            extract_finalized_height("💤 Idle (2 peers), best: #14 (0x9f2a…), finalized #12 (0x11c0…)"),
            Some(12)
        );
        assert_eq!(extract_finalized_height("finalized #0"), Some(0));
        assert_eq!(extract_finalized_height("best: #14"), None);
    }

    #[test]
    fn test_wait_for_line_resolves_on_match() {
        let (tx, rx) = channel();
        thread::spawn(move || {
            tx.send("Syncing".to_string()).unwrap();
            tx.send("Idle (3 peers)".to_string()).unwrap();
        });

        let result = wait_for_line(&rx, Duration::from_secs(5), |line| {
            extract_peer_count(line).is_some_and(|p| p >= 2)
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_wait_for_line_times_out_without_match() {
        let (tx, rx) = channel::<String>();
        // Keep the sender alive so the channel never disconnects.
        let result = wait_for_line(&rx, Duration::from_millis(100), |_| true);
        assert!(result.unwrap_err().contains("no matching line"));
        drop(tx);
    }

    #[test]
    fn test_wait_for_line_times_out_on_insufficient_peers() {
        let (tx, rx) = channel();
        thread::spawn(move || {
            tx.send("Idle (1 peers)".to_string()).unwrap();
            // Keep the channel open past the deadline.
            thread::sleep(Duration::from_millis(300));
        });

        let result = wait_for_line(&rx, Duration::from_millis(100), |line| {
            extract_peer_count(line).is_some_and(|p| p >= 2)
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_wait_for_line_reports_closed_stream() {
        let (tx, rx) = channel::<String>();
        drop(tx);
        let result = wait_for_line(&rx, Duration::from_secs(5), |_| true);
        assert_eq!(result.unwrap_err(), "output stream closed");
    }

    #[test]
    fn test_wait_for_line_stops_consuming_after_match() {
        let (tx, rx) = channel();
        tx.send("Idle (5 peers)".to_string()).unwrap();
        tx.send("Idle (6 peers)".to_string()).unwrap();

        let mut matches = 0;
        let result = wait_for_line(&rx, Duration::from_secs(5), |line| {
            if line.contains("Idle") {
                matches += 1;
                true
            } else {
                false
            }
        });
        assert!(result.is_ok());
        // First match settles the watch; the second line is never observed.
        assert_eq!(matches, 1);
        assert_eq!(rx.try_recv().unwrap(), "Idle (6 peers)");
    }
}
