// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Model-assisted box generation: the vision API client and the parser
//! for its text replies.

pub mod client;
pub mod parser;
