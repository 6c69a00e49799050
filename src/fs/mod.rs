//! Local filesystem module
//!
//! Recursive directory scanning that feeds the sync engine with
//! relative-path file entries.

mod scanner;

pub use scanner::*;
