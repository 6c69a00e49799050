//! Progress reporting module
//!
//! Console progress bars for sync runs.

mod reporter;

pub use reporter::*;
