// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the annotation model, the object store gateway and
//! the auth session provider into the egui shell. All slow work (image
//! decode, gallery calls) runs off-thread; results come back over an mpsc
//! channel drained at the top of every frame, so the model is only ever
//! touched from the UI thread.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use image::DynamicImage;

use crate::auth::session::{LocalSessionProvider, SessionProvider};
use crate::io::{export, media};
use crate::models::meme::{LoadToken, MemeModel};
use crate::settings::Settings;
use crate::storage::config::StorageConfig;
use crate::storage::gateway::ObjectStoreGateway;
use crate::ui::canvas::{self, DragGesture};
use crate::ui::{captions, gallery, uploader};

/// Result of a background operation, delivered to the UI thread.
enum AppEvent {
    ImageLoaded {
        token: LoadToken,
        source: String,
        result: Result<DynamicImage, String>,
    },
    GalleryListed(Result<Vec<String>, String>),
    Uploaded(Result<String, String>),
    Deleted {
        url: String,
        result: Result<(), String>,
    },
}

/// Main application state.
pub struct MemeStudioApp {
    /// The annotation model rendering into its surface
    model: MemeModel,

    /// Persisted user settings
    settings: Settings,

    /// Who is signed in, if anyone
    session: Arc<LocalSessionProvider>,

    /// Gallery backend; `None` when storage is not configured
    gateway: Option<Arc<ObjectStoreGateway>>,

    /// Runtime driving gallery calls and URL fetches
    runtime: tokio::runtime::Runtime,

    /// Client for fetching presigned image URLs
    http: reqwest::Client,

    /// Receiver for background operation results
    events: Receiver<AppEvent>,
    events_tx: Sender<AppEvent>,

    /// URLs of the stored gallery images
    gallery_images: Vec<String>,
    gallery_busy: bool,

    /// File picked for upload, if any
    selected_upload: Option<PathBuf>,
    uploading: bool,

    /// Whether an image load is in flight
    loading_image: bool,

    /// Last user-facing status message
    status: Option<String>,

    /// In-progress drag on the canvas
    drag: Option<DragGesture>,

    /// Texture mirroring the model surface
    canvas_texture: Option<egui::TextureHandle>,
    texture_revision: Option<u64>,
}

impl MemeStudioApp {
    /// Create the application, wiring storage and session from the
    /// environment.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let settings = Settings::load_or_default();

        let session = Arc::new(LocalSessionProvider::from_env());
        session.subscribe(Box::new(|session| match session {
            Some(session) => log::info!("Session is now {}", session.user_id),
            None => log::info!("Session is now signed out"),
        }));

        let gateway = match StorageConfig::from_env().and_then(ObjectStoreGateway::new) {
            Ok(gateway) => Some(Arc::new(gateway)),
            Err(error) => {
                log::warn!("Gallery disabled: {}", error);
                None
            }
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("cannot start async runtime")?;
        let http = media::http_client()?;
        let (events_tx, events) = channel();

        let mut app = Self {
            model: MemeModel::new(),
            settings,
            session,
            gateway,
            runtime,
            http,
            events,
            events_tx,
            gallery_images: Vec::new(),
            gallery_busy: false,
            selected_upload: None,
            uploading: false,
            loading_image: false,
            status: None,
            drag: None,
            canvas_texture: None,
            texture_revision: None,
        };

        app.load_default_image();
        app.refresh_gallery();
        Ok(app)
    }

    /// Load the configured default image when it exists next to the app.
    fn load_default_image(&mut self) {
        let path = PathBuf::from(&self.settings.default_image);
        if path.exists() {
            self.load_image_from_path(path);
        } else {
            log::debug!("No default image {} found", self.settings.default_image);
        }
    }

    /// Load an image file from disk (asynchronously).
    pub fn load_image_from_path(&mut self, path: PathBuf) {
        let token = self.model.begin_load();
        self.loading_image = true;

        let sender = self.events_tx.clone();
        let source = path.display().to_string();

        // Spawn background thread for decoding
        std::thread::spawn(move || {
            let result = std::fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| media::decode_image(&bytes).map_err(|e| e.to_string()));
            let _ = sender.send(AppEvent::ImageLoaded {
                token,
                source,
                result,
            });
        });
    }

    /// Fetch and load a gallery image by its presigned URL.
    fn load_image_from_url(&mut self, url: String) {
        let token = self.model.begin_load();
        self.loading_image = true;

        let sender = self.events_tx.clone();
        let client = self.http.clone();

        self.runtime.spawn(async move {
            let result = media::fetch_image(&client, &url)
                .await
                .map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::ImageLoaded {
                token,
                source: url,
                result,
            });
        });
    }

    fn refresh_gallery(&mut self) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        self.gallery_busy = true;

        let sender = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = gateway.list().await.map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::GalleryListed(result));
        });
    }

    fn upload_selected(&mut self) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        let Some(path) = self.selected_upload.clone() else {
            return;
        };

        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                self.status = Some(format!("Cannot upload {}", path.display()));
                return;
            }
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                self.status = Some(format!("Cannot read {}: {}", path.display(), error));
                return;
            }
        };

        self.uploading = true;
        let sender = self.events_tx.clone();
        self.runtime.spawn(async move {
            let content_type = media::content_type_for(&file_name);
            let result = gateway
                .upload(bytes, content_type, &file_name)
                .await
                .map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::Uploaded(result));
        });
    }

    fn delete_image(&mut self, url: String) {
        let Some(gateway) = self.gateway.clone() else {
            return;
        };
        self.gallery_busy = true;

        let sender = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = gateway.delete(&url).await.map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::Deleted { url, result });
        });
    }

    /// Export the rendered surface as a PNG via a save dialog.
    fn export_meme(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(export::DEFAULT_EXPORT_NAME);
        if let Some(dir) = &self.settings.last_export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        match export::save_png(self.model.surface(), &path) {
            Ok(()) => {
                log::info!("Exported meme to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
                if let Some(parent) = path.parent() {
                    self.settings.last_export_dir = Some(parent.to_path_buf());
                    let _ = self.settings.save();
                }
            }
            Err(error) => {
                log::error!("Failed to export meme: {}", error);
                self.status = Some(format!("Export failed: {}", error));
            }
        }
    }

    /// Apply results of finished background operations.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AppEvent::ImageLoaded {
                    token,
                    source,
                    result,
                } => {
                    self.loading_image = false;
                    match result {
                        Ok(image) => {
                            if self.model.complete_load(token, image, source.as_str()) {
                                self.status = Some(format!(
                                    "Loaded {}",
                                    gallery::display_name(&source)
                                ));
                            }
                        }
                        Err(error) => {
                            self.model.fail_load(token, &error);
                            self.status = Some(format!("Failed to load image: {}", error));
                        }
                    }
                }
                AppEvent::GalleryListed(result) => {
                    self.gallery_busy = false;
                    match result {
                        Ok(images) => self.gallery_images = images,
                        Err(error) => {
                            log::error!("Failed to list gallery: {}", error);
                            self.status = Some(format!("Failed to list images: {}", error));
                        }
                    }
                }
                AppEvent::Uploaded(result) => {
                    self.uploading = false;
                    match result {
                        Ok(url) => {
                            self.gallery_images.push(url);
                            self.selected_upload = None;
                            self.status = Some("Upload complete".to_string());
                        }
                        Err(error) => {
                            log::error!("Upload failed: {}", error);
                            self.status = Some(format!("Upload failed: {}", error));
                        }
                    }
                }
                AppEvent::Deleted { url, result } => {
                    self.gallery_busy = false;
                    match result {
                        Ok(()) => {
                            self.gallery_images.retain(|existing| existing != &url);
                            self.status = Some("Image deleted".to_string());
                        }
                        Err(error) => {
                            log::error!("Delete failed: {}", error);
                            self.status = Some(format!("Delete failed: {}", error));
                        }
                    }
                }
            }
        }
    }

    /// Keep the canvas texture in sync with the model surface.
    fn sync_canvas_texture(&mut self, ctx: &egui::Context) {
        if self.texture_revision == Some(self.model.revision()) && self.canvas_texture.is_some() {
            return;
        }

        let surface = self.model.surface();
        let size = [surface.width() as usize, surface.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, surface.as_raw());
        self.canvas_texture = Some(ctx.load_texture(
            "meme_surface",
            color_image,
            egui::TextureOptions::LINEAR,
        ));
        self.texture_revision = Some(self.model.revision());
    }

    fn is_busy(&self) -> bool {
        self.loading_image || self.gallery_busy || self.uploading
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "bmp"])
                            .pick_file()
                        {
                            self.load_image_from_path(path);
                        }
                        ui.close_menu();
                    }
                    let can_export = self.model.has_image();
                    if ui
                        .add_enabled(can_export, egui::Button::new("Export Meme..."))
                        .clicked()
                    {
                        self.export_meme();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }

    fn show_library_panel(&mut self, ctx: &egui::Context) {
        let mut uploader_action = uploader::UploaderAction::None;
        let mut gallery_action = gallery::GalleryAction::None;

        egui::SidePanel::left("library")
            .default_width(260.0)
            .show(ctx, |ui| {
                if self.gateway.is_none() {
                    ui.heading("Gallery");
                    ui.label(
                        egui::RichText::new("Storage is not configured")
                            .italics()
                            .weak(),
                    );
                    return;
                }

                uploader_action =
                    uploader::show(ui, self.selected_upload.as_deref(), self.uploading);
                ui.separator();
                gallery_action = gallery::show(ui, &self.gallery_images, self.gallery_busy);
            });

        match uploader_action {
            uploader::UploaderAction::PickFile => {
                self.selected_upload = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif"])
                    .pick_file();
            }
            uploader::UploaderAction::Upload => self.upload_selected(),
            uploader::UploaderAction::None => {}
        }

        match gallery_action {
            gallery::GalleryAction::Refresh => self.refresh_gallery(),
            gallery::GalleryAction::Load(url) => self.load_image_from_url(url),
            gallery::GalleryAction::Delete(url) => self.delete_image(url),
            gallery::GalleryAction::None => {}
        }
    }

    fn show_captions_panel(&mut self, ctx: &egui::Context) {
        let action = egui::SidePanel::right("captions")
            .default_width(250.0)
            .show(ctx, |ui| {
                captions::show(ui, self.model.captions(), self.model.has_image())
            })
            .inner;

        match action {
            captions::CaptionsAction::EditCaption(index, text) => {
                self.model.update_caption(index, text);
            }
            captions::CaptionsAction::Export => self.export_meme(),
            captions::CaptionsAction::None => {}
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.model.current_image_source() {
                    Some(source) => ui.label(gallery::display_name(source)),
                    None => ui.label("No image loaded"),
                };
                ui.separator();
                ui.label(format!("{} caption box(es)", self.model.regions().len()));
                ui.separator();
                match self.session.current_session() {
                    Some(session) => {
                        let who = session.email.unwrap_or(session.user_id);
                        ui.label(format!("Signed in as {}", who))
                    }
                    None => ui.label("Not signed in"),
                };

                if self.is_busy() {
                    ui.separator();
                    ui.spinner();
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(egui::RichText::new(status).weak());
                }
            });
        });
    }
}

impl eframe::App for MemeStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        // Request repaint while background work is in flight (to deliver
        // results promptly and keep spinners moving)
        if self.is_busy() {
            ctx.request_repaint();
        }

        self.sync_canvas_texture(ctx);

        self.show_menu_bar(ctx);
        self.show_library_panel(ctx);
        self.show_captions_panel(ctx);
        self.show_status_bar(ctx);

        // Main canvas (center)
        let surface = self.model.surface();
        let surface_size = (surface.width(), surface.height());
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    self.canvas_texture.as_ref(),
                    surface_size,
                    &mut self.drag,
                    self.model.has_image(),
                )
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::AddRegion(region) => self.model.add_region(region),
            canvas::CanvasAction::None => {}
        }
    }
}
