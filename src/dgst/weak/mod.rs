// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// Module: weak algorithm warnings helper
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! Registry of digest algorithms with known collision attacks and the
//! stderr banner shown when one of them is selected.

use crate::dgst::algorithm::Algorithm;
use colored::Colorize;
use std::io::{self, Write};

/// Environment variable that silences the banner when set.
pub const SUPPRESS_ENV: &str = "RDGST_NO_WEAK_WARNING";

const NIST_REFERENCE: &str =
	"https://doi.org/10.6028/NIST.SP.800-131Ar2";
const RFC6151_REFERENCE: &str =
	"https://datatracker.ietf.org/doc/html/rfc6151";

const REFERENCES: &[&str] = &[NIST_REFERENCE, RFC6151_REFERENCE];

/// Metadata describing a weak algorithm entry in the registry.
#[derive(Debug, Clone)]
pub struct WeakAlgorithmMetadata {
	pub algorithm: Algorithm,
	/// Replacement suggestion shown to the user.
	pub replacement_hint: &'static str,
}

/// Warning banner content emitted to stderr when a weak algorithm is used.
#[derive(Debug, Clone)]
pub struct WarningMessage {
	pub headline: String,
	pub body: String,
	pub references: &'static [&'static str],
}

impl WarningMessage {
	pub fn banner(&self) -> String {
		format!("{} {}", self.headline, self.body)
	}
}

const WEAK_ALGORITHMS: &[WeakAlgorithmMetadata] =
	&[WeakAlgorithmMetadata {
		algorithm: Algorithm::Md5,
		replacement_hint: "Use SHA-256 where collision resistance matters",
	}];

pub fn metadata_for(
	algorithm: Algorithm,
) -> Option<&'static WeakAlgorithmMetadata> {
	WEAK_ALGORITHMS
		.iter()
		.find(|entry| entry.algorithm == algorithm)
}

pub fn warning_for(algorithm: Algorithm) -> Option<WarningMessage> {
	let metadata = metadata_for(algorithm)?;
	let headline = format!(
		"WARNING: {} is a weak algorithm (collisions known).",
		metadata.algorithm.display_name()
	);
	let body = format!(
		"See NIST SP 800-131A rev.2 and RFC 6151. {}.",
		metadata.replacement_hint
	);
	Some(WarningMessage {
		headline,
		body,
		references: REFERENCES,
	})
}

pub fn all_metadata() -> &'static [WeakAlgorithmMetadata] {
	WEAK_ALGORITHMS
}

/// Whether the banner is silenced through the environment.
pub fn suppressed_by_env() -> bool {
	std::env::var_os(SUPPRESS_ENV).is_some()
}

/// Write the banner and its references, highlighted when the terminal
/// supports it.
pub fn emit_warning_banner<W: Write>(
	message: &WarningMessage,
	err: &mut W,
) -> io::Result<()> {
	let references = message.references.join(" | ");
	writeln!(err, "{}", message.banner().yellow().bold())?;
	writeln!(err, "{}", format!("References: {}", references).yellow())
}
