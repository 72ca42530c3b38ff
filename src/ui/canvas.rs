// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the rendered meme surface.
//!
//! This module displays the model's surface and turns drag gestures into
//! new caption boxes. While a drag is in progress the box is previewed
//! with the painter; the region itself is only created on release.

use crate::models::region::Region;
use crate::util::geometry;

/// Drags shorter than this diagonal are treated as slips, not boxes.
const MIN_DRAG_DIAGONAL: f32 = 3.0;

/// An in-progress drag, in image pixel coordinates.
pub struct DragGesture {
    pub start: (f32, f32),
    pub current: (f32, f32),
}

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    AddRegion(Region),
}

/// Display the canvas area and handle drag interactions.
pub fn show(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    surface_size: (u32, u32),
    drag: &mut Option<DragGesture>,
    has_image: bool,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let texture = match texture.filter(|_| has_image) {
            Some(texture) => texture,
            None => {
                show_welcome(ui);
                return;
            }
        };

        let available = ui.available_size();
        let (display_width, display_height) =
            geometry::fit_display_size((available.x, available.y), surface_size);

        // Center the image
        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        // Draw the rendered surface
        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let display_origin = (image_rect.min.x, image_rect.min.y);
        let display_size = (display_width, display_height);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let point =
                    geometry::screen_to_image((pos.x, pos.y), display_origin, display_size, surface_size);
                *drag = Some(DragGesture {
                    start: point,
                    current: point,
                });
            }
        }

        if response.dragged() {
            if let (Some(gesture), Some(pos)) = (drag.as_mut(), response.interact_pointer_pos()) {
                gesture.current =
                    geometry::screen_to_image((pos.x, pos.y), display_origin, display_size, surface_size);
            }
        }

        if response.drag_stopped() {
            if let Some(gesture) = drag.take() {
                let region = Region::from_drag_corners(gesture.start, gesture.current);
                if region.diagonal() >= MIN_DRAG_DIAGONAL {
                    action = CanvasAction::AddRegion(region);
                } else {
                    log::debug!("Ignoring drag below minimum size");
                }
            }
        }

        // Preview the in-progress box on top of the surface
        if let Some(gesture) = drag.as_ref() {
            let start =
                geometry::image_to_screen(gesture.start, display_origin, display_size, surface_size);
            let current =
                geometry::image_to_screen(gesture.current, display_origin, display_size, surface_size);
            let preview = egui::Rect::from_two_pos(
                egui::pos2(start.0, start.1),
                egui::pos2(current.0, current.1),
            );
            ui.painter().rect_stroke(
                preview,
                0.0,
                egui::Stroke::new(2.0, egui::Color32::RED),
            );
        }
    });

    action
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("MemeStudio")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Caption images from your gallery or disk")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image to begin, then drag on it to add a caption box")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
