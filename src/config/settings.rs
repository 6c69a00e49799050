//! Configuration settings for BucketSync
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for sync operations.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default number of concurrent transfers in flight.
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Default number of items dispatched to a worker per scheduling round.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Maximum keys requested per listing page.
pub const LIST_PAGE_SIZE: usize = 1000;

/// BucketSync - Parallel directory/object-storage synchronization
#[derive(Parser, Debug, Clone)]
#[command(name = "bucketsync")]
#[command(author = "BucketSync Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mirror a local directory to an object-storage prefix, or back")]
#[command(long_about = r#"
BucketSync mirrors a local directory tree to an object-storage bucket prefix
(upload) or a bucket prefix to a local directory (download), transferring
files in parallel with a bounded worker pool.

Examples:
  bucketsync upload ./dataset backups/dataset          # upload a tree
  bucketsync download origin-data/run42 ./download     # download a prefix
  bucketsync upload ./logs logs/ -j 8 --progress       # 8 workers, progress bars
"#)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Bucket name (or set S3_BUCKET)
    #[arg(long, global = true, env = "S3_BUCKET", value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// Region (or set AWS_REGION)
    #[arg(long, global = true, value_name = "REGION")]
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible services (MinIO, Ceph, OSS)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Number of concurrent transfers (0 = auto-detect)
    #[arg(short = 'j', long, global = true, default_value = "30", value_name = "NUM")]
    pub concurrency: usize,

    /// Items dispatched per worker scheduling round
    #[arg(long, global = true, default_value = "100", value_name = "NUM")]
    pub batch_size: usize,

    /// Show progress bars
    #[arg(short = 'p', long, global = true)]
    pub progress: bool,

    /// Suppress all non-error output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Upload a local directory tree to a remote prefix
    Upload {
        /// Local directory to upload
        #[arg(value_name = "LOCAL_DIR")]
        local_dir: PathBuf,

        /// Remote prefix to upload under
        #[arg(value_name = "REMOTE_PREFIX")]
        remote_prefix: String,
    },
    /// Download every object under a remote prefix to a local directory
    Download {
        /// Remote prefix to download
        #[arg(value_name = "REMOTE_PREFIX")]
        remote_prefix: String,

        /// Local directory to download into
        #[arg(value_name = "LOCAL_DIR")]
        local_dir: PathBuf,
    },
}

/// Direction of a sync operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Local directory to remote prefix
    Upload,
    /// Remote prefix to local directory
    Download,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upload => write!(f, "upload"),
            Direction::Download => write!(f, "download"),
        }
    }
}

/// Runtime settings for one sync operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum number of transfers in flight
    pub concurrency: usize,
    /// Items handed to a worker per scheduling round
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SyncConfig {
    /// Build from CLI arguments, resolving auto-detect values.
    pub fn from_cli(args: &CliArgs) -> Self {
        let concurrency = if args.concurrency == 0 {
            num_cpus::get()
        } else {
            args.concurrency
        };
        let batch_size = args.batch_size.max(1);

        Self {
            concurrency,
            batch_size,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }
        if self.batch_size == 0 {
            return Err("Batch size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Object-store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Region
    pub region: String,
    /// Custom endpoint URL (for MinIO, Ceph, OSS, etc.)
    pub endpoint: Option<String>,
    /// Access key ID
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Bucket name
    pub bucket: String,
    /// Use path-style URLs (required for some S3-compatible services)
    pub path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            bucket: String::new(),
            path_style: false,
        }
    }
}

impl S3Config {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("AWS_ENDPOINT_URL")
                .ok()
                .or_else(|| std::env::var("S3_ENDPOINT").ok()),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            bucket: std::env::var("S3_BUCKET").unwrap_or_default(),
            path_style: std::env::var("S3_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Overlay explicit CLI values on top of environment settings.
    pub fn with_cli(mut self, args: &CliArgs) -> Self {
        if let Some(ref bucket) = args.bucket {
            self.bucket = bucket.clone();
        }
        if let Some(ref region) = args.region {
            self.region = region.clone();
        }
        if let Some(ref endpoint) = args.endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        self
    }

    /// Create config for MinIO
    pub fn minio(endpoint: &str, access_key: &str, secret_key: &str, bucket: &str) -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: Some(endpoint.to_string()),
            access_key_id: Some(access_key.to_string()),
            secret_access_key: Some(secret_key.to_string()),
            bucket: bucket.to_string(),
            path_style: true, // MinIO requires path-style
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("Bucket name is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.concurrency, 30);
        assert_eq!(config.batch_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sync_config_rejects_zero_concurrency() {
        let config = SyncConfig {
            concurrency: 0,
            batch_size: 100,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_s3_config_minio() {
        let config = S3Config::minio(
            "http://localhost:9000",
            "minioadmin",
            "minioadmin",
            "test-bucket",
        );

        assert!(config.path_style);
        assert_eq!(config.endpoint, Some("http://localhost:9000".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_config_requires_bucket() {
        let config = S3Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Upload.to_string(), "upload");
        assert_eq!(Direction::Download.to_string(), "download");
    }
}
