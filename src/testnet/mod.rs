//! Local multi-validator network orchestration
//!
//! This module composes spec generation, keystore seeding, process
//! spawning, and readiness gating into a single launchable test network.

pub mod local;

pub use local::{LocalNetwork, NetworkOptions};
