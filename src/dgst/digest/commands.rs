// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// Digest command handlers (string/file/stdin)

use crate::dgst::algorithm::Algorithm;
use crate::dgst::app::PROGRAM_NAME;
use crate::dgst::engine::Hasher;
use crate::dgst::error::DgstError;
use crate::dgst::output::{
	echo_prefix, echo_suffix, DigestRecord, DigestSource, OutputStyle,
};
use crate::dgst::present::NewlineStrippingEcho;
use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read, Write};

/// Bytes requested from a file or stdin per read.
pub const READ_BUFFER_SIZE: usize = 4096;

/// Everything resolved from the command line before hashing starts.
#[derive(Clone, Debug)]
pub struct DigestOptions {
	pub algorithm: Algorithm,
	/// `-p`: echo stdin and append its digest.
	pub echo_stdin: bool,
	pub style: OutputStyle,
	/// `-s` arguments, in command line order.
	pub strings: Vec<String>,
	pub files: Vec<String>,
}

impl DigestOptions {
	pub fn new(algorithm: Algorithm) -> Self {
		Self {
			algorithm,
			echo_stdin: false,
			style: OutputStyle::Standard,
			strings: Vec::new(),
			files: Vec::new(),
		}
	}

	/// Stdin is hashed with `-p`, or when nothing else was given.
	pub fn reads_stdin(&self) -> bool {
		self.echo_stdin
			|| (self.strings.is_empty() && self.files.is_empty())
	}
}

/// Tally of a finished batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchOutcome {
	pub hashed: usize,
	pub failed: usize,
}

impl BatchOutcome {
	pub fn exit_code(&self) -> i32 {
		if self.failed > 0 {
			1
		} else {
			0
		}
	}

	fn record<E: Write>(
		&mut self,
		result: Result<(), DgstError>,
		algorithm: Algorithm,
		err: &mut E,
	) -> Result<(), DgstError> {
		match result {
			Ok(()) => {
				self.hashed += 1;
				Ok(())
			}
			Err(error) if error.is_recoverable() => {
				self.failed += 1;
				writeln!(
					err,
					"{}: {}: {}",
					PROGRAM_NAME,
					algorithm.id(),
					error
				)
				.map_err(DgstError::Output)
			}
			Err(error) => Err(error),
		}
	}
}

/// Hash every input named in `options`, one context reused throughout.
///
/// Order: stdin (when read), then strings, then files. A failing input
/// is reported on `err` and skipped; only a broken `out` aborts.
pub fn digest_batch<R, W, E>(
	options: &DigestOptions,
	stdin: R,
	out: &mut W,
	err: &mut E,
) -> Result<BatchOutcome, DgstError>
where
	R: Read,
	W: Write,
	E: Write,
{
	let mut hasher = Hasher::new(options.algorithm);
	let mut outcome = BatchOutcome::default();

	if options.reads_stdin() {
		let result = if options.echo_stdin {
			digest_stdin_echo(&mut hasher, stdin, options.style, out)
		} else {
			digest_stdin(&mut hasher, stdin, options.style, out)
		};
		outcome.record(result, options.algorithm, err)?;
	}

	for text in &options.strings {
		let result =
			digest_string(&mut hasher, text, options.style, out);
		outcome.record(result, options.algorithm, err)?;
	}

	for path in &options.files {
		let result = digest_file(&mut hasher, path, options.style, out);
		outcome.record(result, options.algorithm, err)?;
	}

	out.flush().map_err(DgstError::Output)?;
	debug!(
		"{}: {} inputs hashed, {} failed",
		options.algorithm, outcome.hashed, outcome.failed
	);
	Ok(outcome)
}

/// Hash a literal string argument.
pub fn digest_string<W: Write>(
	hasher: &mut Hasher,
	text: &str,
	style: OutputStyle,
	out: &mut W,
) -> Result<(), DgstError> {
	debug!(
		"{}: hashing string of {} bytes",
		hasher.algorithm(),
		text.len()
	);
	let digest = hasher.process_bytes(text.as_bytes());
	let record = DigestRecord::from_digest(
		hasher.algorithm(),
		DigestSource::Literal(text.to_string()),
		&digest,
	);
	writeln!(out, "{}", record.format(style)).map_err(DgstError::Output)
}

/// Hash the contents of a file.
pub fn digest_file<W: Write>(
	hasher: &mut Hasher,
	path: &str,
	style: OutputStyle,
	out: &mut W,
) -> Result<(), DgstError> {
	debug!("{}: hashing file {}", hasher.algorithm(), path);
	let file = File::open(path).map_err(|e| DgstError::io(path, e))?;
	hasher.reset();
	stream_into(
		hasher,
		file,
		|e| DgstError::io(path, e),
		|_| Ok(()),
	)?;
	let record = DigestRecord::from_digest(
		hasher.algorithm(),
		DigestSource::File(path.to_string()),
		&hasher.finalize(),
	);
	writeln!(out, "{}", record.format(style)).map_err(DgstError::Output)
}

/// Hash standard input without echoing it.
pub fn digest_stdin<R: Read, W: Write>(
	hasher: &mut Hasher,
	stdin: R,
	style: OutputStyle,
	out: &mut W,
) -> Result<(), DgstError> {
	debug!("{}: hashing stdin", hasher.algorithm());
	hasher.reset();
	stream_into(hasher, stdin, DgstError::Stdin, |_| Ok(()))?;
	let record = DigestRecord::from_digest(
		hasher.algorithm(),
		DigestSource::Stdin,
		&hasher.finalize(),
	);
	writeln!(out, "{}", record.format(style)).map_err(DgstError::Output)
}

/// Hash standard input while echoing it to `out` as it is read.
///
/// The trailing newline of the stream is hashed but not echoed.
pub fn digest_stdin_echo<R: Read, W: Write>(
	hasher: &mut Hasher,
	stdin: R,
	style: OutputStyle,
	out: &mut W,
) -> Result<(), DgstError> {
	debug!("{}: hashing and echoing stdin", hasher.algorithm());
	hasher.reset();
	out.write_all(echo_prefix(style).as_bytes())
		.map_err(DgstError::Output)?;

	let mut echo = NewlineStrippingEcho::new(&mut *out);
	let streamed =
		stream_into(hasher, stdin, DgstError::Stdin, |chunk| {
			echo.push(chunk).map_err(DgstError::Output)
		});
	trace!("echoed {} bytes", echo.echoed());
	let out = echo.finish();

	if let Err(error) = streamed {
		if error.is_recoverable() {
			// Close the partially echoed line
			out.write_all(b"\n").map_err(DgstError::Output)?;
		}
		return Err(error);
	}

	let digest = hasher.finalize();
	out.write_all(echo_suffix(style, &digest).as_bytes())
		.map_err(DgstError::Output)
}

/// Read `reader` to the end in [`READ_BUFFER_SIZE`] chunks, feeding each
/// chunk to the hasher and then to `on_chunk`. Finishes the hasher at end
/// of input.
fn stream_into<R, M, F>(
	hasher: &mut Hasher,
	mut reader: R,
	read_error: M,
	mut on_chunk: F,
) -> Result<(), DgstError>
where
	R: Read,
	M: Fn(io::Error) -> DgstError,
	F: FnMut(&[u8]) -> Result<(), DgstError>,
{
	let mut buffer = [0u8; READ_BUFFER_SIZE];
	loop {
		let count = match reader.read(&mut buffer) {
			Ok(0) => break,
			Ok(count) => count,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(read_error(e)),
		};
		trace!("read {} bytes", count);
		hasher.chomp(&buffer[..count]);
		on_chunk(&buffer[..count])?;
	}
	hasher.finish();
	debug!(
		"{}: {} bytes hashed",
		hasher.algorithm(),
		hasher.total_len()
	);
	Ok(())
}
