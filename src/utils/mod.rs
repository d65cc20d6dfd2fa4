//! Utility functions and helpers
//!
//! This module contains cryptographic utilities and encoding functions
//! used throughout the harness.

pub mod crypto;

pub use crypto::{base58_decode, base58_encode, checksum, hex_lower, sha256_digest, CHECK_SUM_LEN};
