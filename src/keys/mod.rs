//! Authority key derivation and keystore seeding
//!
//! This module derives the deterministic per-seed key triples used to
//! populate chain-spec authority lists, and seeds each validator's on-disk
//! keystore through the node binary.

pub mod derive;
pub mod keystore;

pub use derive::{derive_authority_keys, derive_public, AuthorityKeys, SS58_PREFIX};
pub use keystore::insert_node_keys;
