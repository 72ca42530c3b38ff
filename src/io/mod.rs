// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media loading and surface export.

pub mod export;
pub mod media;
