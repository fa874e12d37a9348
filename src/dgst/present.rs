// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: present.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

//! Hex rendering of digests and the pass-through echo used by `-p`.

use std::io::{self, Write};

/// Lowercase hexadecimal, two characters per byte, no separators.
pub fn to_hex(digest: &[u8]) -> String {
	hex::encode(digest)
}

/// Writes echoed input through to `inner`, holding back a trailing `\n`
/// until more data arrives.
///
/// Only the newline that ends the whole stream is dropped: a held back
/// newline is released as soon as another non-empty chunk is written.
#[derive(Debug)]
pub struct NewlineStrippingEcho<W: Write> {
	inner: W,
	held_newline: bool,
	echoed: u64,
}

impl<W: Write> NewlineStrippingEcho<W> {
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			held_newline: false,
			echoed: 0,
		}
	}

	/// Echo one chunk of the stream.
	pub fn push(&mut self, chunk: &[u8]) -> io::Result<()> {
		if chunk.is_empty() {
			return Ok(());
		}
		if self.held_newline {
			self.inner.write_all(b"\n")?;
			self.echoed += 1;
			self.held_newline = false;
		}
		let body = match chunk.split_last() {
			Some((b'\n', body)) => {
				self.held_newline = true;
				body
			}
			_ => chunk,
		};
		self.inner.write_all(body)?;
		self.echoed += body.len() as u64;
		Ok(())
	}

	/// Bytes written to the inner writer so far.
	pub fn echoed(&self) -> u64 {
		self.echoed
	}

	/// End of stream: drop any held newline and hand back the writer.
	pub fn finish(self) -> W {
		self.inner
	}
}
