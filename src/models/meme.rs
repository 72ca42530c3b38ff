// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! The meme annotation model.
//!
//! [`MemeModel`] owns the base image, the ordered list of caption regions
//! with their caption texts, and the raster surface everything is rendered
//! into. All mutating operations trigger a full redraw, so the surface is
//! always a deterministic function of the current state.
//!
//! Image loads are asynchronous and go through a token protocol: callers
//! obtain a [`LoadToken`] from [`MemeModel::begin_load`], perform the
//! fetch/decode off-thread, and hand the result back via
//! [`MemeModel::complete_load`] or [`MemeModel::fail_load`]. Tokens carry a
//! monotonic sequence number, so when several loads race only the most
//! recently requested one may apply (last call wins); stale completions are
//! discarded.

use ab_glyph::FontArc;
use image::{DynamicImage, RgbaImage};

use super::region::Region;
use crate::render;

/// Surface dimensions before any image has been loaded.
const EMPTY_SURFACE_SIZE: (u32, u32) = (640, 480);

/// Handle identifying one in-flight image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

pub struct MemeModel {
    image: Option<DynamicImage>,
    image_source: Option<String>,
    regions: Vec<Region>,
    captions: Vec<String>,
    surface: RgbaImage,
    font: Option<FontArc>,
    load_seq: u64,
    revision: u64,
}

impl Default for MemeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemeModel {
    pub fn new() -> Self {
        let font = render::load_system_font();
        if font.is_none() {
            log::warn!("No usable system font found; captions will not be rendered");
        }

        let (width, height) = EMPTY_SURFACE_SIZE;
        Self {
            image: None,
            image_source: None,
            regions: Vec::new(),
            captions: Vec::new(),
            surface: RgbaImage::new(width, height),
            font,
            load_seq: 0,
            revision: 0,
        }
    }

    /// Register a new image load and return its token.
    ///
    /// Issuing a new token supersedes every earlier one: results delivered
    /// for an older token are ignored.
    pub fn begin_load(&mut self) -> LoadToken {
        self.load_seq += 1;
        LoadToken(self.load_seq)
    }

    /// Apply a finished image load.
    ///
    /// Replaces the base image, resizes the surface to the image's natural
    /// pixel dimensions and redraws. Regions and captions are kept; they
    /// simply render over the new backdrop. Returns `false` when the token
    /// is stale and the result was discarded.
    pub fn complete_load(
        &mut self,
        token: LoadToken,
        image: DynamicImage,
        source: impl Into<String>,
    ) -> bool {
        if token.0 != self.load_seq {
            log::debug!("Discarding superseded image load (token {})", token.0);
            return false;
        }

        let source = source.into();
        log::info!(
            "Loaded image: {} ({}x{})",
            source,
            image.width(),
            image.height()
        );
        self.image = Some(image);
        self.image_source = Some(source);
        self.redraw();
        true
    }

    /// Record a failed image load. Prior state is left untouched.
    pub fn fail_load(&mut self, token: LoadToken, error: &str) {
        if token.0 != self.load_seq {
            log::debug!("Ignoring failure of superseded image load: {}", error);
            return;
        }
        log::error!("Failed to load image: {}", error);
    }

    /// Append a region together with its empty caption slot and redraw.
    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
        self.captions.push(String::new());
        log::info!("Added caption box, total: {}", self.regions.len());
        self.redraw();
    }

    /// Replace the caption at `index` and redraw.
    ///
    /// An out-of-range index is a no-op.
    pub fn update_caption(&mut self, index: usize, text: impl Into<String>) {
        match self.captions.get_mut(index) {
            Some(caption) => {
                *caption = text.into();
                self.redraw();
            }
            None => {
                log::debug!("Ignoring caption update for unknown box {}", index);
            }
        }
    }

    /// Re-render the surface from the current state.
    ///
    /// The output is fully determined by the base image, regions and
    /// captions; calling this twice with unchanged state produces
    /// pixel-identical surfaces.
    pub fn redraw(&mut self) {
        match &self.image {
            Some(image) => {
                match render::render_surface(image, &self.regions, &self.captions, self.font.as_ref())
                {
                    Ok(surface) => self.surface = surface,
                    Err(error) => {
                        log::error!("Failed to render surface: {}", error);
                        return;
                    }
                }
            }
            None => {
                // No backdrop yet; a cleared surface of the placeholder size.
                let (width, height) = EMPTY_SURFACE_SIZE;
                self.surface = RgbaImage::new(width, height);
            }
        }
        self.revision += 1;
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Bumped on every successful redraw; lets views refresh their textures
    /// only when the surface actually changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Source (path or URL) of the current base image, if any.
    pub fn current_image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemeModel, Region};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([40, 80, 120, 255]),
        ))
    }

    #[test]
    fn regions_and_captions_stay_paired() {
        let mut model = MemeModel::new();
        for i in 0..5 {
            model.add_region(Region::new(i as f32, 0.0, 10.0, 10.0));
            assert_eq!(model.regions().len(), model.captions().len());
        }
        assert_eq!(model.regions().len(), 5);
    }

    #[test]
    fn added_region_reads_back_with_empty_caption() {
        let mut model = MemeModel::new();
        model.add_region(Region::new(10.0, 10.0, 50.0, 20.0));

        assert_eq!(model.regions(), &[Region::new(10.0, 10.0, 50.0, 20.0)]);
        assert_eq!(model.captions(), &[String::new()]);
    }

    #[test]
    fn update_caption_replaces_text_at_index() {
        let mut model = MemeModel::new();
        model.add_region(Region::new(0.0, 0.0, 20.0, 20.0));
        model.add_region(Region::new(30.0, 0.0, 20.0, 20.0));

        model.update_caption(1, "bottom text");

        assert_eq!(model.captions()[0], "");
        assert_eq!(model.captions()[1], "bottom text");
    }

    #[test]
    fn update_caption_out_of_range_is_a_no_op() {
        let mut model = MemeModel::new();
        model.add_region(Region::new(0.0, 0.0, 20.0, 20.0));
        model.update_caption(0, "kept");

        model.update_caption(7, "dropped");

        assert_eq!(model.captions(), &["kept".to_string()]);
    }

    #[test]
    fn completed_load_resizes_surface_to_image_dimensions() {
        let mut model = MemeModel::new();
        let token = model.begin_load();

        assert!(model.complete_load(token, test_image(96, 64), "memory"));

        assert_eq!(model.surface().dimensions(), (96, 64));
        assert_eq!(model.surface().get_pixel(0, 0).0, [40, 80, 120, 255]);
        assert_eq!(model.current_image_source(), Some("memory"));
    }

    #[test]
    fn superseded_load_is_discarded() {
        let mut model = MemeModel::new();
        let stale = model.begin_load();
        let fresh = model.begin_load();

        assert!(model.complete_load(fresh, test_image(50, 40), "fresh"));
        assert!(!model.complete_load(stale, test_image(999, 999), "stale"));

        assert_eq!(model.surface().dimensions(), (50, 40));
        assert_eq!(model.current_image_source(), Some("fresh"));
    }

    #[test]
    fn failed_load_leaves_state_unchanged() {
        let mut model = MemeModel::new();
        let token = model.begin_load();
        assert!(model.complete_load(token, test_image(30, 30), "first"));
        model.add_region(Region::new(1.0, 1.0, 5.0, 5.0));
        let before = model.surface().clone();

        let token = model.begin_load();
        model.fail_load(token, "decode error");

        assert_eq!(model.surface().as_raw(), before.as_raw());
        assert_eq!(model.regions().len(), 1);
        assert_eq!(model.current_image_source(), Some("first"));
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut model = MemeModel::new();
        let token = model.begin_load();
        model.complete_load(token, test_image(64, 48), "memory");
        model.add_region(Region::new(8.0, 8.0, 30.0, 16.0));

        let first = model.surface().clone();
        model.redraw();
        let second = model.surface().clone();

        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn replacing_the_image_keeps_regions_and_captions() {
        let mut model = MemeModel::new();
        let token = model.begin_load();
        model.complete_load(token, test_image(64, 48), "first");
        model.add_region(Region::new(4.0, 4.0, 20.0, 10.0));
        model.update_caption(0, "stays");

        let token = model.begin_load();
        model.complete_load(token, test_image(128, 96), "second");

        assert_eq!(model.regions().len(), 1);
        assert_eq!(model.captions(), &["stays".to_string()]);
        assert_eq!(model.surface().dimensions(), (128, 96));
    }
}
