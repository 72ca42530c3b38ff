// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Caption editor panel.
//!
//! One text input per caption box, bound by index, plus the export button.

/// Result of caption panel interaction.
pub enum CaptionsAction {
    None,
    EditCaption(usize, String),
    Export,
}

/// Display the caption inputs and return the requested action.
pub fn show(ui: &mut egui::Ui, captions: &[String], can_export: bool) -> CaptionsAction {
    let mut action = CaptionsAction::None;

    ui.heading("Text Inputs");

    if captions.is_empty() {
        ui.label(
            egui::RichText::new("Drag on the image to add a caption box")
                .italics()
                .weak(),
        );
    }

    egui::ScrollArea::vertical()
        .id_source("caption_inputs")
        .show(ui, |ui| {
            for (index, caption) in captions.iter().enumerate() {
                let mut text = caption.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text(format!("Text for box {}", index + 1)),
                );
                if response.changed() {
                    action = CaptionsAction::EditCaption(index, text);
                }
            }
        });

    ui.separator();
    if ui
        .add_enabled(can_export, egui::Button::new("Download Meme"))
        .clicked()
    {
        action = CaptionsAction::Export;
    }

    action
}
