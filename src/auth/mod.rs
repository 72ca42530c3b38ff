// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Auth session provider contract and the local implementation.

pub mod session;
