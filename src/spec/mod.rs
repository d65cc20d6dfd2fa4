//! Chain-spec generation and genesis patching
//!
//! This module drives the external node binary's `build-spec` subcommand to
//! produce the raw chain spec consumed by every validator, optionally
//! patching the genesis document in memory first.

pub mod builder;
pub mod patch;

pub use builder::{generate, DEFAULT_ENDOWMENT};
pub use patch::SpecPatch;
