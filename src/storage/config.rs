// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Object store configuration.
//!
//! The configuration is constructed explicitly (usually from the
//! environment) and injected into the gateway; credentials never live in
//! module-level state.

use std::env;
use std::time::Duration;

use super::gateway::StorageError;

/// Default key prefix for gallery images.
pub const DEFAULT_BASE_PATH: &str = "base_template_images";

/// How long presigned GET URLs stay valid.
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Key prefix under which gallery images are stored.
    pub base_path: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2); `None` means
    /// plain AWS S3.
    pub endpoint: Option<String>,
    pub presign_expiry: Duration,
}

impl StorageConfig {
    /// Read the configuration from `MEMESTUDIO_*` variables, falling back
    /// to the standard `AWS_*` names for region and credentials.
    pub fn from_env() -> Result<Self, StorageError> {
        let region = var_or("MEMESTUDIO_REGION", "AWS_REGION")?;
        let bucket = env::var("MEMESTUDIO_BUCKET")
            .map_err(|_| StorageError::Config("MEMESTUDIO_BUCKET is not set".into()))?;
        let access_key_id = var_or("MEMESTUDIO_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID")?;
        let secret_access_key = var_or("MEMESTUDIO_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY")?;
        let base_path =
            env::var("MEMESTUDIO_BASE_PATH").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string());
        let endpoint = env::var("MEMESTUDIO_ENDPOINT").ok();

        Ok(Self {
            region,
            bucket,
            access_key_id,
            secret_access_key,
            base_path,
            endpoint,
            presign_expiry: DEFAULT_PRESIGN_EXPIRY,
        })
    }

    /// Public base URL all object URLs of this store share, with a trailing
    /// slash.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                format!("{}/{}/", endpoint.trim_end_matches('/'), self.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region),
        }
    }

    /// Public URL of an object key in this store.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url(), key)
    }

    /// Recover the object key from a URL previously handed out by this
    /// store, dropping any query string (presigned URLs carry signature
    /// parameters). Returns `None` for URLs outside this store.
    pub fn object_key_from_url(&self, url: &str) -> Option<String> {
        let without_query = url.split('?').next().unwrap_or(url);
        let key = without_query.strip_prefix(&self.base_url())?;
        if key.is_empty() {
            return None;
        }
        Some(key.to_string())
    }
}

fn var_or(primary: &str, fallback: &str) -> Result<String, StorageError> {
    env::var(primary)
        .or_else(|_| env::var(fallback))
        .map_err(|_| StorageError::Config(format!("{} (or {}) is not set", primary, fallback)))
}

#[cfg(test)]
mod tests {
    use super::{StorageConfig, DEFAULT_PRESIGN_EXPIRY};

    fn config() -> StorageConfig {
        StorageConfig {
            region: "region".to_string(),
            bucket: "bucket".to_string(),
            access_key_id: "id".to_string(),
            secret_access_key: "secret".to_string(),
            base_path: "base".to_string(),
            endpoint: None,
            presign_expiry: DEFAULT_PRESIGN_EXPIRY,
        }
    }

    #[test]
    fn base_url_uses_virtual_hosted_style() {
        assert_eq!(
            config().base_url(),
            "https://bucket.s3.region.amazonaws.com/"
        );
    }

    #[test]
    fn base_url_with_custom_endpoint_is_path_style() {
        let mut config = config();
        config.endpoint = Some("http://localhost:9000".to_string());
        assert_eq!(config.base_url(), "http://localhost:9000/bucket/");
    }

    #[test]
    fn key_recovery_strips_base_url_and_query_string() {
        let key = config().object_key_from_url(
            "https://bucket.s3.region.amazonaws.com/base/123-name.png?X-Amz-Signature=abc",
        );
        assert_eq!(key.as_deref(), Some("base/123-name.png"));
    }

    #[test]
    fn key_recovery_works_without_query_string() {
        let key = config()
            .object_key_from_url("https://bucket.s3.region.amazonaws.com/base/42-plain.jpg");
        assert_eq!(key.as_deref(), Some("base/42-plain.jpg"));
    }

    #[test]
    fn foreign_urls_yield_no_key() {
        let config = config();
        assert_eq!(
            config.object_key_from_url("https://other.s3.region.amazonaws.com/base/x.png"),
            None
        );
        assert_eq!(
            config.object_key_from_url("https://bucket.s3.region.amazonaws.com/"),
            None
        );
    }

    #[test]
    fn public_url_round_trips_through_key_recovery() {
        let config = config();
        let url = config.public_url("base/7-meme.png");
        assert_eq!(
            config.object_key_from_url(&url).as_deref(),
            Some("base/7-meme.png")
        );
    }
}
