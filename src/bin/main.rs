// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: main.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

use env_logger::{Builder, Env};
use rustdgst::dgst::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	Builder::from_env(Env::default().default_filter_or("warn")).init();
	app::run()?;
	Ok(())
}
