// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Upload widget: pick a local image and push it to the gallery.

use std::path::Path;

/// Result of uploader interaction.
pub enum UploaderAction {
    None,
    PickFile,
    Upload,
}

/// Display the upload section and return the requested action.
pub fn show(ui: &mut egui::Ui, selected: Option<&Path>, uploading: bool) -> UploaderAction {
    let mut action = UploaderAction::None;

    ui.heading("Upload");
    ui.horizontal(|ui| {
        if ui.button("Choose Image...").clicked() {
            action = UploaderAction::PickFile;
        }
    });

    if let Some(path) = selected {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ui.label(egui::RichText::new(name).monospace());

        let label = if uploading { "Uploading..." } else { "Confirm Upload" };
        if ui
            .add_enabled(!uploading, egui::Button::new(label))
            .clicked()
        {
            action = UploaderAction::Upload;
        }
    }

    action
}
