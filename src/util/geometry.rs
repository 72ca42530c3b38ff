// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for fitting the surface into the canvas
//! panel and for mapping between screen coordinates and image pixel
//! coordinates.

/// Size the image display to fit the available area while preserving the
/// image's aspect ratio (letterboxing).
pub fn fit_display_size(available: (f32, f32), image: (u32, u32)) -> (f32, f32) {
    let image_aspect = image.0 as f32 / image.1 as f32;
    let available_aspect = available.0 / available.1;

    if image_aspect > available_aspect {
        // Image is wider, fit to width
        let width = available.0;
        (width, width / image_aspect)
    } else {
        // Image is taller, fit to height
        let height = available.1;
        (height * image_aspect, height)
    }
}

/// Map a screen position inside the display rect to image pixel
/// coordinates, clamped to the image bounds.
pub fn screen_to_image(
    pos: (f32, f32),
    display_origin: (f32, f32),
    display_size: (f32, f32),
    image: (u32, u32),
) -> (f32, f32) {
    let rel_x = (pos.0 - display_origin.0) / display_size.0;
    let rel_y = (pos.1 - display_origin.1) / display_size.1;
    (
        (rel_x * image.0 as f32).clamp(0.0, image.0 as f32),
        (rel_y * image.1 as f32).clamp(0.0, image.1 as f32),
    )
}

/// Map image pixel coordinates back to a screen position inside the
/// display rect.
pub fn image_to_screen(
    point: (f32, f32),
    display_origin: (f32, f32),
    display_size: (f32, f32),
    image: (u32, u32),
) -> (f32, f32) {
    (
        display_origin.0 + point.0 / image.0 as f32 * display_size.0,
        display_origin.1 + point.1 / image.1 as f32 * display_size.1,
    )
}
