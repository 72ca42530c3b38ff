// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Raster composition of the meme surface.
//!
//! Rendering happens in two stages: region outlines are stroked onto a
//! tiny-skia pixmap seeded with the base image, then caption glyphs are
//! rasterized onto the resulting RGBA buffer. Captions get a dark halo pass
//! under a light fill pass so they stay legible on arbitrary backdrops.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use anyhow::{anyhow, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::models::region::Region;

/// Outline color for caption boxes.
pub const OUTLINE_COLOR: [u8; 4] = [255, 0, 0, 255];
/// Outline stroke width in pixels.
pub const OUTLINE_WIDTH: f32 = 2.0;
/// Caption glyph size in pixels.
pub const CAPTION_SIZE: f32 = 20.0;

const CAPTION_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CAPTION_HALO: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Offsets for the halo pass, one glyph copy per direction.
const HALO_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Render the base image with all regions and captions into a fresh surface.
///
/// The surface matches the base image's natural dimensions. Regions draw in
/// index order, so a later region paints over an earlier one where they
/// overlap. Output depends only on the inputs.
pub fn render_surface(
    base: &DynamicImage,
    regions: &[Region],
    captions: &[String],
    font: Option<&FontArc>,
) -> Result<RgbaImage> {
    let rgba = base.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate surface pixmap"))?;
    pixmap.data_mut().copy_from_slice(rgba.as_raw());

    for region in regions {
        stroke_region(&mut pixmap, region, OUTLINE_COLOR, OUTLINE_WIDTH);
    }

    let mut surface = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("cannot construct surface image"))?;

    if let Some(font) = font {
        for (region, caption) in regions.iter().zip(captions) {
            if caption.is_empty() {
                continue;
            }
            draw_caption(&mut surface, font, region, caption);
        }
    }

    Ok(surface)
}

/// Stroke one region outline onto the pixmap.
pub(crate) fn stroke_region(pixmap: &mut Pixmap, region: &Region, color: [u8; 4], width: f32) {
    let Some(rect) = Rect::from_ltrb(
        region.x,
        region.y,
        region.x + region.width,
        region.y + region.height,
    ) else {
        log::debug!("Skipping outline for degenerate region {:?}", region);
        return;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        ..Default::default()
    };

    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn draw_caption(surface: &mut RgbaImage, font: &FontArc, region: &Region, caption: &str) {
    let (text_width, text_height) = measure_caption(font, CAPTION_SIZE, caption);
    let (x, y) = caption_origin(region, text_width, text_height);

    for (dx, dy) in HALO_OFFSETS {
        draw_text_mut(surface, CAPTION_HALO, x + dx, y + dy, CAPTION_SIZE, font, caption);
    }
    draw_text_mut(surface, CAPTION_FILL, x, y, CAPTION_SIZE, font, caption);
}

/// Width and line height of `text` at the given pixel size.
pub fn measure_caption(font: &FontArc, size: f32, text: &str) -> (f32, f32) {
    let scaled = font.as_scaled(PxScale::from(size));
    let width = text
        .chars()
        .map(|c| scaled.h_advance(scaled.glyph_id(c)))
        .sum();
    (width, scaled.height())
}

/// Top-left glyph origin that centers a caption of the given extent in a
/// region.
pub fn caption_origin(region: &Region, text_width: f32, text_height: f32) -> (i32, i32) {
    let (cx, cy) = region.center();
    (
        (cx - text_width / 2.0).round() as i32,
        (cy - text_height / 2.0).round() as i32,
    )
}

/// Load the first usable system font.
///
/// Captions are skipped entirely when none of the candidates exists, e.g.
/// on a stripped-down container; outlines still render.
pub fn load_system_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Helvetica.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                log::debug!("Using caption font {}", path);
                return Some(font);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{caption_origin, render_surface, stroke_region};
    use crate::models::region::Region;
    use image::{DynamicImage, Rgba, RgbaImage};
    use tiny_skia::Pixmap;

    fn white_base(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    #[test]
    fn surface_matches_base_dimensions() {
        let base = white_base(320, 200);
        let surface = render_surface(&base, &[], &[], None).expect("render should succeed");
        assert_eq!(surface.dimensions(), (320, 200));
    }

    #[test]
    fn rendering_is_deterministic() {
        let base = white_base(64, 64);
        let regions = vec![Region::new(8.0, 8.0, 40.0, 24.0)];
        let captions = vec![String::new()];

        let first = render_surface(&base, &regions, &captions, None).unwrap();
        let second = render_surface(&base, &regions, &captions, None).unwrap();

        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn outline_paints_over_the_backdrop() {
        let base = white_base(64, 64);
        let regions = vec![Region::new(8.0, 8.0, 40.0, 24.0)];
        let captions = vec![String::new()];

        let surface = render_surface(&base, &regions, &captions, None).unwrap();

        // Pixel centered on the top edge of the box is pure outline color.
        assert_eq!(surface.get_pixel(28, 8).0, [255, 0, 0, 255]);
        // Well inside the box the backdrop shows through.
        assert_eq!(surface.get_pixel(28, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn later_strokes_win_in_overlaps() {
        let mut pixmap = Pixmap::new(64, 64).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);

        // First region's right edge at x=20 crosses the second region's top
        // edge at y=4; they intersect at (20, 4).
        let first = Region::new(4.0, 4.0, 16.0, 16.0);
        let second = Region::new(12.0, 4.0, 16.0, 16.0);

        stroke_region(&mut pixmap, &first, [255, 0, 0, 255], 2.0);
        stroke_region(&mut pixmap, &second, [0, 0, 255, 255], 2.0);

        let index = (4 * 64 + 20) * 4;
        let pixel = &pixmap.data()[index..index + 4];
        assert_eq!(pixel, [0, 0, 255, 255]);
    }

    #[test]
    fn degenerate_region_is_skipped() {
        let base = white_base(32, 32);
        let regions = vec![Region::new(f32::NAN, 0.0, 10.0, 10.0)];
        let captions = vec![String::new()];

        // Must not panic; the bad outline is simply not drawn.
        let surface = render_surface(&base, &regions, &captions, None).unwrap();
        assert_eq!(surface.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn caption_origin_centers_text_in_region() {
        let region = Region::new(10.0, 10.0, 50.0, 20.0);
        assert_eq!(caption_origin(&region, 30.0, 10.0), (20, 15));
    }
}
