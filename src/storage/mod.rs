// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! S3-compatible object storage for the shared image gallery.

pub mod config;
pub mod gateway;
