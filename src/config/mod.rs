//! Configuration management
//!
//! This module handles basic configuration settings for the harness,
//! including the node binary location and the base data directory.
//!
//! Simplified to focus on essential harness configuration only.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
