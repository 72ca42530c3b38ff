// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Object store gateway.
//!
//! Thin wrapper around an OpenDAL S3 operator exposing the three gallery
//! operations: upload bytes and get a URL back, list stored images as
//! presigned URLs, and delete by URL. Works against AWS S3 or any
//! S3-compatible endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use opendal::services::S3;
use opendal::Operator;
use thiserror::Error;

use super::config::StorageConfig;

/// Image extensions the gallery lists, matched case-insensitively.
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not configured: {0}")]
    Config(String),
    #[error("object store operation failed: {0}")]
    Backend(#[from] opendal::Error),
    #[error("url does not belong to this store: {0}")]
    ForeignUrl(String),
}

#[derive(Clone)]
pub struct ObjectStoreGateway {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStoreGateway {
    /// Build a gateway from an injected configuration.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let mut builder = S3::default()
            .bucket(&config.bucket)
            .region(&config.region)
            .access_key_id(&config.access_key_id)
            .secret_access_key(&config.secret_access_key);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }

        let operator = Operator::new(builder)?.finish();
        Ok(Self { operator, config })
    }

    /// Store image bytes under a fresh timestamped key and return the
    /// object's public URL.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<String, StorageError> {
        let key = make_object_key(&self.config.base_path, timestamp_millis(), file_name);
        log::info!("Uploading {} byte(s) to {}", bytes.len(), key);

        self.operator
            .write_with(&key, bytes)
            .content_type(content_type)
            .await?;

        Ok(self.config.public_url(&key))
    }

    /// List gallery images as presigned GET URLs.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", self.config.base_path);
        let entries = self.operator.list(&prefix).await?;

        let mut urls = Vec::new();
        for entry in entries {
            let path = entry.path();
            if path.ends_with('/') || !is_image_key(path) {
                continue;
            }
            let request = self
                .operator
                .presign_read(path, self.config.presign_expiry)
                .await?;
            urls.push(request.uri().to_string());
        }

        log::debug!("Listed {} gallery image(s)", urls.len());
        Ok(urls)
    }

    /// Delete the object a URL from [`upload`](Self::upload) or
    /// [`list`](Self::list) points at.
    pub async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = self
            .config
            .object_key_from_url(url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        log::info!("Deleting {}", key);
        self.operator.delete(&key).await?;
        Ok(())
    }

    /// Key-recovery rule used by [`delete`](Self::delete).
    pub fn object_key_from_url(&self, url: &str) -> Option<String> {
        self.config.object_key_from_url(url)
    }
}

/// Key layout for uploaded images: `{base_path}/{timestamp_millis}-{name}`.
fn make_object_key(base_path: &str, timestamp_millis: u128, file_name: &str) -> String {
    format!("{}/{}-{}", base_path, timestamp_millis, file_name)
}

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Whether a key names a gallery-visible image.
fn is_image_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|extension| lower.ends_with(extension))
}
