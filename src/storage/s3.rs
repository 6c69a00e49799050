//! S3-compatible object store backed by the AWS CLI
//!
//! Shells out to `aws s3api` / `aws s3 cp` per operation, pushing
//! credentials and endpoint settings through the process environment.
//! The CLI owns transport, multipart transfer and per-operation retry,
//! which keeps this handle trivially safe to share across workers.

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

use crate::config::S3Config;
use crate::error::{Result, SyncError};
use crate::storage::{ObjectPage, ObjectStore, RemoteObject};

/// Object store handle for one bucket
#[derive(Debug)]
pub struct S3Store {
    config: S3Config,
}

impl S3Store {
    /// Create a store for the bucket named in `config`.
    pub fn new(config: S3Config) -> Result<Self> {
        config.validate().map_err(SyncError::config)?;
        Ok(Self { config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(S3Config::from_env())
    }

    /// Bucket this store operates on
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn s3_url(&self, key: &str) -> String {
        format!("s3://{}/{}", self.config.bucket, key)
    }

    /// Run the CLI, returning stdout or the failure message.
    fn run(&self, cmd: &mut Command) -> std::result::Result<Vec<u8>, String> {
        let output = cmd
            .env_args(&self.config)
            .output()
            .map_err(|e| format!("aws cli spawn: {}", e))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        Ok(output.stdout)
    }
}

/// Wire shape of `aws s3api list-objects` output
#[derive(Debug, Deserialize, Default)]
struct ListObjectsOutput {
    #[serde(rename = "Contents", default)]
    contents: Vec<ListedObject>,
    #[serde(rename = "NextMarker")]
    next_marker: Option<String>,
    #[serde(rename = "IsTruncated", default)]
    is_truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Size")]
    size: Option<u64>,
}

impl ObjectStore for S3Store {
    fn list_objects(
        &self,
        prefix: &str,
        marker: Option<&str>,
        max_keys: usize,
    ) -> Result<ObjectPage> {
        let mut cmd = Command::new("aws");
        cmd.args([
            "s3api",
            "list-objects",
            "--bucket",
            &self.config.bucket,
            "--prefix",
            prefix,
            "--max-keys",
            &max_keys.to_string(),
            "--output",
            "json",
        ]);
        if let Some(marker) = marker {
            cmd.args(["--marker", marker]);
        }

        let stdout = self
            .run(&mut cmd)
            .map_err(|message| SyncError::listing(prefix, message))?;

        // An empty result set prints nothing at all
        let parsed: ListObjectsOutput = if stdout.iter().all(u8::is_ascii_whitespace) {
            ListObjectsOutput::default()
        } else {
            serde_json::from_slice(&stdout)
                .map_err(|e| SyncError::listing(prefix, format!("bad listing response: {}", e)))?
        };

        // Without a delimiter the API omits NextMarker; the last key of a
        // truncated page is the resume point.
        let next_marker = if parsed.is_truncated {
            parsed
                .next_marker
                .or_else(|| parsed.contents.last().map(|o| o.key.clone()))
        } else {
            None
        };

        Ok(ObjectPage {
            objects: parsed
                .contents
                .into_iter()
                .map(|o| RemoteObject {
                    key: o.key,
                    size: o.size,
                })
                .collect(),
            next_marker,
        })
    }

    fn put_object(&self, key: &str, local_path: &Path) -> Result<u64> {
        tracing::debug!(key, path = %local_path.display(), "put object");

        let mut cmd = Command::new("aws");
        cmd.args([
            "s3",
            "cp",
            &local_path.display().to_string(),
            &self.s3_url(key),
            "--only-show-errors",
        ]);

        self.run(&mut cmd)
            .map_err(|message| SyncError::transfer(key, message))?;

        let metadata = std::fs::metadata(local_path).map_err(|e| SyncError::io(local_path, e))?;
        Ok(metadata.len())
    }

    fn get_object(&self, key: &str, local_path: &Path) -> Result<u64> {
        tracing::debug!(key, path = %local_path.display(), "get object");

        let mut cmd = Command::new("aws");
        cmd.args([
            "s3",
            "cp",
            &self.s3_url(key),
            &local_path.display().to_string(),
            "--only-show-errors",
        ]);

        self.run(&mut cmd)
            .map_err(|message| SyncError::transfer(key, message))?;

        let metadata = std::fs::metadata(local_path).map_err(|e| SyncError::io(local_path, e))?;
        Ok(metadata.len())
    }
}

/// Extension trait pushing S3 settings into a Command's environment
trait CommandS3Ext {
    fn env_args(&mut self, config: &S3Config) -> &mut Self;
}

impl CommandS3Ext for Command {
    fn env_args(&mut self, config: &S3Config) -> &mut Self {
        if let Some(ref endpoint) = config.endpoint {
            self.env("AWS_ENDPOINT_URL", endpoint);
        }
        if let Some(ref key) = config.access_key_id {
            self.env("AWS_ACCESS_KEY_ID", key);
        }
        if let Some(ref secret) = config.secret_access_key {
            self.env("AWS_SECRET_ACCESS_KEY", secret);
        }
        self.env("AWS_REGION", &config.region);

        if config.path_style {
            self.env("AWS_S3_FORCE_PATH_STYLE", "true");
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_rejects_missing_bucket() {
        let err = S3Store::new(S3Config::default()).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_s3_url() {
        let store = S3Store::new(S3Config {
            bucket: "my-bucket".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(store.s3_url("data/a.txt"), "s3://my-bucket/data/a.txt");
    }

    #[test]
    fn test_parse_truncated_listing() {
        let json = r#"{
            "Contents": [
                {"Key": "data/a.txt", "Size": 12},
                {"Key": "data/sub/", "Size": 0}
            ],
            "IsTruncated": true
        }"#;

        let parsed: ListObjectsOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.contents.len(), 2);
        assert!(parsed.is_truncated);
        assert!(parsed.next_marker.is_none());
        assert_eq!(parsed.contents[1].key, "data/sub/");
    }

    #[test]
    fn test_parse_final_listing_page() {
        let json = r#"{"Contents": [{"Key": "data/b.txt", "Size": 3}], "IsTruncated": false}"#;
        let parsed: ListObjectsOutput = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_truncated);
        assert_eq!(parsed.contents[0].size, Some(3));
    }
}
