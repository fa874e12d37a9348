// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: error.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

use std::io;
use thiserror::Error;

/// Errors raised while hashing a batch of inputs.
///
/// `Io` and `Stdin` are per-input failures: they are reported and the
/// batch moves on. `Output` means stdout itself is broken and aborts the
/// run.
#[derive(Debug, Error)]
pub enum DgstError {
	#[error("{path}: {}", describe(.source))]
	Io {
		path: String,
		#[source]
		source: io::Error,
	},
	#[error("stdin: {}", describe(.0))]
	Stdin(#[source] io::Error),
	#[error("write failed: {0}")]
	Output(#[source] io::Error),
}

impl DgstError {
	pub fn io(path: impl Into<String>, source: io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Whether the batch can continue with the next input.
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, Self::Output(_))
	}
}

// `io::Error` appends "(os error N)" for OS errors; diagnostics only
// show the message part, like other digest tools.
fn describe(error: &io::Error) -> String {
	let message = error.to_string();
	match message.find(" (os error") {
		Some(index) => message[..index].to_string(),
		None => message,
	}
}
