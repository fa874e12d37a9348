// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: lib.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

pub mod dgst {
	pub mod algorithm;
	pub mod app;
	pub mod digest;
	pub mod engine;
	pub mod error;
	pub mod md5;
	pub mod output;
	pub mod present;
	pub mod sha256;
	pub mod weak;
}
