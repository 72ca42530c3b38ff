// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! MemeStudio
//!
//! A cross-platform desktop application for composing caption memes:
//! drag boxes over a base image, type the captions, export a PNG.
//! Base images live in an S3-compatible gallery shared between users.

mod app;
mod auth;
mod io;
mod models;
mod render;
mod settings;
mod storage;
mod ui;
mod util;

use anyhow::Result;
use app::MemeStudioApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("MemeStudio"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "MemeStudio",
        options,
        Box::new(|cc| Ok(Box::new(MemeStudioApp::new(cc)?))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
