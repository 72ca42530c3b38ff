// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! PNG export of the rendered surface.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};

/// Default file name offered when exporting.
pub const DEFAULT_EXPORT_NAME: &str = "meme.png";

/// Encode the surface as PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    surface
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

/// Encode the surface and write it to `path`.
pub fn save_png(surface: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(surface)?;
    std::fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::encode_png;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encoded_bytes_carry_the_png_signature() {
        let surface = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&surface).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }
}
