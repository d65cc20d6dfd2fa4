//! # Chain Testkit - My Local Testnet Harness
//!
//! This is my test infrastructure for standing up real multi-validator
//! networks from an external node binary. When I come back to this code,
//! here's what I need to remember:
//!
//! ## What I Built
//! - **Chain Spec Builder**: Drives `build-spec` on the node binary and
//!   patches authorities/balances into the genesis JSON before rawifying
//! - **Key Derivation**: Deterministic seed -> {aura, grandpa, account}
//!   address triples, so spec authorities and keystores always agree
//! - **Node Lifecycle**: One spawned OS process per validator with a live
//!   stderr line stream and clean termination
//! - **Readiness Watching**: Blocks tests until a node is idle, sees its
//!   peers, or finalizes a height - all parsed from the node's own logs
//! - **Tx Finalization**: Watches a submitted transaction to its terminal
//!   event and retries flaky subscriptions up to a bound
//!
//! ## How I Organized My Code
//! - `spec/`: chain-spec generation and genesis patching
//! - `keys/`: key derivation and keystore seeding
//! - `node/`: process spawning, output streaming, readiness conditions
//! - `tx/`: submit-and-watch capabilities, retry loop, polling helpers
//! - `testnet/`: the LocalNetwork orchestrator tying it all together
//! - `config/`: environment-driven defaults for the CLI
//! - `utils/`: hashing and encoding helpers
//! - `cli/`: command-line interface for the harness operations
//!
//! ## Key Design Decisions I Made
//! - Readiness is inferred from log lines behind a channel seam, so a
//!   structured health signal could replace scraping without touching callers
//! - All waiting is a blocking channel receive with deadline arithmetic;
//!   settling a watch always detaches its subscription first
//! - The RPC context is an explicit injected object with a destroy() call,
//!   never a process-wide global
//! - A finalized-but-failed transaction still counts as complete; the
//!   dispatch error is logged, not escalated

pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod node;
pub mod spec;
pub mod testnet;
pub mod tx;
pub mod utils;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use error::{HarnessError, Result};
pub use keys::{derive_authority_keys, insert_node_keys, AuthorityKeys};
pub use node::{
    ensure_finalized_blocks, ensure_peer_count, ensure_started, Node, NodeOptions,
    RESERVED_IDENTITIES,
};
pub use spec::{SpecPatch, DEFAULT_ENDOWMENT};
pub use testnet::{LocalNetwork, NetworkOptions};
pub use tx::{
    wait_for_blocks, wait_for_nonce_change, wait_for_transaction_completion,
    wait_for_transaction_with_retry, ChainQuery, RpcContext, SubmitAndWatch, TxEvent,
    TxSubscription,
};
