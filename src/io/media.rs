// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Media loading: image decoding and presigned-URL fetches.
//!
//! Decoding and fetching run on background workers; the results are routed
//! back to the UI thread and applied to the model through its load-token
//! protocol.

use std::time::Duration;

use anyhow::{Context, Result};
use image::DynamicImage;

/// Decode an image from raw file bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("cannot decode image data")
}

/// Build the HTTP client used for gallery image fetches.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .context("cannot build HTTP client")
}

/// Fetch an image from a (typically presigned) URL and decode it.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<DynamicImage> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("cannot fetch image from {}", url))?;
    let bytes = response
        .bytes()
        .await
        .context("cannot read image response body")?;
    decode_image(&bytes)
}

/// MIME type for an image file name, used as the upload content type.
pub fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::{content_type_for, decode_image};
    use crate::io::export::encode_png;
    use image::{Rgba, RgbaImage};

    #[test]
    fn decodes_png_bytes() {
        let source = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&source).unwrap();

        let decoded = decode_image(&bytes).expect("valid PNG should decode");
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn content_type_matches_extension_case_insensitively() {
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("meme.png"), "image/png");
        assert_eq!(content_type_for("loop.Gif"), "image/gif");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
    }
}
