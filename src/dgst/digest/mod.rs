// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: src/dgst/digest/mod.rs
// Author: rustdgst maintainers
//
// Digest command group: string/file/stdin hashing logic lives here.

pub mod commands;
