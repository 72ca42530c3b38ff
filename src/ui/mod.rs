// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the MemeStudio application.

pub mod canvas;
pub mod captions;
pub mod gallery;
pub mod uploader;
