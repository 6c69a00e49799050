//! Core sync engine module
//!
//! Provides the transfer orchestration: the bounded worker pool,
//! per-object upload/download operations, and the directory-level
//! sync engine.

mod engine;
mod pool;

pub use engine::*;
pub use pool::*;
