//! Object storage module
//!
//! Defines the `ObjectStore` interface the sync engine runs against,
//! the paginated remote listing iterator, and an S3-compatible
//! implementation backed by the AWS CLI.

mod s3;
mod store;

pub use s3::*;
pub use store::*;
