//! Configuration module for BucketSync
//!
//! Provides configuration management including CLI arguments,
//! object-store settings, and runtime defaults.

mod settings;

pub use settings::*;
