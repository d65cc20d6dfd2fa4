//! Validator node process lifecycle
//!
//! This module spawns validator processes from the node binary, streams
//! their log output, and gates test progression on readiness conditions
//! parsed from that output.

pub mod options;
pub mod process;
pub mod readiness;

pub use options::{NodeOptions, RESERVED_IDENTITIES};
pub use process::Node;
pub use readiness::{
    ensure_finalized_blocks, ensure_peer_count, ensure_started, FINALIZED_TIMEOUT, PEERS_TIMEOUT,
    START_TIMEOUT,
};
