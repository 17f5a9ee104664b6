//! Flowbeat Common Utilities
//!
//! Shared infrastructure for all flowbeat crates:
//! - Error types and result aliases
//! - Pipeline tunables and application configuration loading
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
