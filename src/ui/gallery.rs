// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Gallery panel listing the images stored in the shared bucket.

/// Result of gallery interaction.
pub enum GalleryAction {
    None,
    Refresh,
    Load(String),
    Delete(String),
}

/// Display the gallery list and return the requested action.
pub fn show(ui: &mut egui::Ui, images: &[String], busy: bool) -> GalleryAction {
    let mut action = GalleryAction::None;

    ui.horizontal(|ui| {
        ui.heading("Gallery");
        if busy {
            ui.spinner();
        } else if ui.button("⟳ Refresh").clicked() {
            action = GalleryAction::Refresh;
        }
    });

    if images.is_empty() && !busy {
        ui.label(
            egui::RichText::new("No stored images yet")
                .italics()
                .weak(),
        );
        return action;
    }

    egui::ScrollArea::vertical()
        .id_source("gallery_list")
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            for url in images {
                ui.horizontal(|ui| {
                    ui.label(display_name(url));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Delete").clicked() {
                            action = GalleryAction::Delete(url.clone());
                        }
                        if ui.small_button("Load").clicked() {
                            action = GalleryAction::Load(url.clone());
                        }
                    });
                });
            }
        });

    action
}

/// Human-readable name of a gallery entry, derived from its URL.
pub fn display_name(url: &str) -> &str {
    url.split('?')
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::display_name;

    #[test]
    fn display_name_is_the_file_name_without_query() {
        let url = "https://bucket.s3.region.amazonaws.com/base/123-cat.png?X-Amz-Signature=abc";
        assert_eq!(display_name(url), "123-cat.png");
    }

    #[test]
    fn display_name_of_a_bare_name_is_itself() {
        assert_eq!(display_name("cat.png"), "cat.png");
    }
}
