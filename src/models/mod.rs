// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box model and annotation session state.

pub mod bbox;
pub mod session;
