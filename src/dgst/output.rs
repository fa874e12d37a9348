// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// Module: output
// Purpose: dgst-style digest lines for files, strings and stdin.

use crate::dgst::algorithm::Algorithm;
use crate::dgst::present::to_hex;
use std::fmt;

/// Layout of a digest line, resolved from the `-q` / `-r` flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputStyle {
	/// `ALG(label) = hex`
	#[default]
	Standard,
	/// `hex label`
	Reverse,
	/// `hex`
	Quiet,
}

impl OutputStyle {
	/// Quiet wins over reverse.
	pub fn from_flags(quiet: bool, reverse: bool) -> Self {
		match (quiet, reverse) {
			(true, _) => Self::Quiet,
			(false, true) => Self::Reverse,
			(false, false) => Self::Standard,
		}
	}
}

impl fmt::Display for OutputStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Standard => "standard",
			Self::Reverse => "reverse",
			Self::Quiet => "quiet",
		};
		f.write_str(label)
	}
}

/// Identifies where the digest originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DigestSource {
	File(String),
	Literal(String),
	Stdin,
}

/// One finished digest, ready to be printed.
#[derive(Clone, Debug)]
pub struct DigestRecord {
	pub algorithm: Algorithm,
	pub source: DigestSource,
	pub digest_hex: String,
}

impl DigestRecord {
	pub fn from_digest(
		algorithm: Algorithm,
		source: DigestSource,
		digest: &[u8],
	) -> Self {
		Self {
			algorithm,
			source,
			digest_hex: to_hex(digest),
		}
	}

	/// Render the record as a single line, without the trailing newline.
	pub fn format(&self, style: OutputStyle) -> String {
		let hex = self.digest_hex.as_str();
		match (style, &self.source) {
			(OutputStyle::Quiet, _) => hex.to_string(),
			(OutputStyle::Reverse, DigestSource::File(path)) => {
				format!("{hex} {path}")
			}
			(OutputStyle::Reverse, DigestSource::Literal(text)) => {
				format!("{hex} \"{text}\"")
			}
			(OutputStyle::Reverse, DigestSource::Stdin) => {
				format!("{hex} (stdin)")
			}
			(OutputStyle::Standard, DigestSource::File(path)) => {
				format!("{}({path}) = {hex}", self.algorithm)
			}
			(OutputStyle::Standard, DigestSource::Literal(text)) => {
				format!("{}(\"{text}\") = {hex}", self.algorithm)
			}
			(OutputStyle::Standard, DigestSource::Stdin) => {
				format!("(stdin) = {hex}")
			}
		}
	}
}

/// Text written before the echoed stdin bytes in `-p` mode.
pub fn echo_prefix(style: OutputStyle) -> &'static str {
	match style {
		OutputStyle::Quiet => "",
		OutputStyle::Standard | OutputStyle::Reverse => "(\"",
	}
}

/// Text written after the echoed stdin bytes in `-p` mode, trailing
/// newline included.
pub fn echo_suffix(style: OutputStyle, digest: &[u8]) -> String {
	let hex = to_hex(digest);
	match style {
		OutputStyle::Quiet => format!("\n{hex}\n"),
		OutputStyle::Standard | OutputStyle::Reverse => {
			format!("\") = {hex}\n")
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MD5_EMPTY: [u8; 16] = [
		0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80,
		0x09, 0x98, 0xec, 0xf8, 0x42, 0x7e,
	];
	const HEX: &str = "d41d8cd98f00b204e9800998ecf8427e";

	fn record(source: DigestSource) -> DigestRecord {
		DigestRecord::from_digest(Algorithm::Md5, source, &MD5_EMPTY)
	}

	#[test]
	fn style_from_flags() {
		assert_eq!(OutputStyle::from_flags(false, false), OutputStyle::Standard);
		assert_eq!(OutputStyle::from_flags(false, true), OutputStyle::Reverse);
		assert_eq!(OutputStyle::from_flags(true, true), OutputStyle::Quiet);
		assert_eq!(OutputStyle::from_flags(true, false), OutputStyle::Quiet);
	}

	#[test]
	fn standard_lines() {
		assert_eq!(
			record(DigestSource::File("a.txt".into()))
				.format(OutputStyle::Standard),
			format!("MD5(a.txt) = {HEX}")
		);
		assert_eq!(
			record(DigestSource::Literal(String::new()))
				.format(OutputStyle::Standard),
			format!("MD5(\"\") = {HEX}")
		);
		assert_eq!(
			record(DigestSource::Stdin).format(OutputStyle::Standard),
			format!("(stdin) = {HEX}")
		);
	}

	#[test]
	fn reverse_lines() {
		assert_eq!(
			record(DigestSource::File("a.txt".into()))
				.format(OutputStyle::Reverse),
			format!("{HEX} a.txt")
		);
		assert_eq!(
			record(DigestSource::Literal("x y".into()))
				.format(OutputStyle::Reverse),
			format!("{HEX} \"x y\"")
		);
		assert_eq!(
			record(DigestSource::Stdin).format(OutputStyle::Reverse),
			format!("{HEX} (stdin)")
		);
	}

	#[test]
	fn quiet_lines_are_bare_hex() {
		for source in [
			DigestSource::File("a.txt".into()),
			DigestSource::Literal("x".into()),
			DigestSource::Stdin,
		] {
			assert_eq!(record(source).format(OutputStyle::Quiet), HEX);
		}
	}

	#[test]
	fn sha256_label() {
		let record = DigestRecord::from_digest(
			Algorithm::Sha256,
			DigestSource::File("f".into()),
			&[0u8; 32],
		);
		assert!(record
			.format(OutputStyle::Standard)
			.starts_with("SHA256(f) = 0000"));
		assert_eq!(record.digest_hex.len(), 64);
	}

	#[test]
	fn echo_framing() {
		assert_eq!(echo_prefix(OutputStyle::Standard), "(\"");
		assert_eq!(echo_prefix(OutputStyle::Reverse), "(\"");
		assert_eq!(echo_prefix(OutputStyle::Quiet), "");
		assert_eq!(
			echo_suffix(OutputStyle::Standard, &MD5_EMPTY),
			format!("\") = {HEX}\n")
		);
		assert_eq!(
			echo_suffix(OutputStyle::Quiet, &MD5_EMPTY),
			format!("\n{HEX}\n")
		);
	}
}
