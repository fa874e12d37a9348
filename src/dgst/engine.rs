// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: engine.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

//! Streaming digest contexts.
//!
//! A [`DigestContext`] accepts input in chunks of any size, compresses
//! every complete block as soon as it is available and keeps at most
//! `BLOCK_SIZE - 1` bytes pending between calls. [`DigestContext::finish`]
//! applies Merkle-Damgard padding and folds the final block(s).

use crate::dgst::algorithm::{
	Algorithm, Block, HashAlgorithm, LENGTH_FIELD_SIZE, PADDING_MARKER,
};
use crate::dgst::md5::Md5;
use crate::dgst::sha256::Sha256;
use byteorder::ByteOrder;
use log::trace;
use std::fmt;
use std::marker::PhantomData;

/// Mutable hashing state for one input at a time.
pub struct DigestContext<A: HashAlgorithm> {
	// Running hash state
	state: A::State,
	// Message bytes already folded into `state`
	processed: u64,
	// In-progress block
	buffer: A::Block,
	buffer_len: usize,
	// Expected message length, if known up front
	known_length: Option<u64>,
	finalized: bool,
	_algorithm: PhantomData<A>,
}

impl<A: HashAlgorithm> DigestContext<A> {
	pub fn new() -> Self {
		Self {
			state: A::INITIAL_STATE,
			processed: 0,
			buffer: A::Block::zeroed(),
			buffer_len: 0,
			known_length: None,
			finalized: false,
			_algorithm: PhantomData,
		}
	}

	/// Create a context that finalizes itself once `length` bytes have
	/// been consumed. A length of zero means "unknown".
	pub fn with_known_length(length: u64) -> Self {
		let mut context = Self::new();
		context.set_known_length(length);
		context
	}

	pub fn set_known_length(&mut self, length: u64) {
		self.known_length = (length != 0).then_some(length);
	}

	pub fn algorithm(&self) -> Algorithm {
		A::ALGORITHM
	}

	pub fn processed_bytes(&self) -> u64 {
		self.processed
	}

	pub fn pending_len(&self) -> usize {
		self.buffer_len
	}

	/// Total message bytes consumed so far, pending ones included.
	pub fn total_len(&self) -> u64 {
		self.processed + self.buffer_len as u64
	}

	pub fn known_length(&self) -> Option<u64> {
		self.known_length
	}

	pub fn is_finalized(&self) -> bool {
		self.finalized
	}

	/// Feed a chunk of input.
	///
	/// Empty chunks are always accepted. Feeding data to a finalized
	/// context without calling [`reset`](Self::reset) first, or past a
	/// declared known length, is a caller bug and panics.
	pub fn chomp(&mut self, mut input: &[u8]) {
		if input.is_empty() {
			return;
		}
		assert!(
			!self.finalized,
			"chomp on a finalized {} context without reset",
			A::ALGORITHM
		);
		if let Some(known) = self.known_length {
			assert!(
				self.total_len() + input.len() as u64 <= known,
				"input exceeds declared length of {} bytes",
				known
			);
		}

		let block_size = A::BLOCK_SIZE;

		// Top up a partially filled buffer first
		if self.buffer_len > 0 {
			let remaining = block_size - self.buffer_len;
			let take = remaining.min(input.len());
			self.buffer.as_mut()[self.buffer_len..self.buffer_len + take]
				.copy_from_slice(&input[..take]);
			self.buffer_len += take;
			input = &input[take..];

			if self.buffer_len < block_size {
				self.auto_finish();
				return;
			}
			A::compress(&mut self.state, self.buffer.as_ref());
			self.processed += block_size as u64;
			self.buffer_len = 0;
		}

		// Buffer is empty, so whole blocks can be read straight from input
		let mut blocks = input.chunks_exact(block_size);
		for block in blocks.by_ref() {
			A::compress(&mut self.state, block);
			self.processed += block_size as u64;
		}
		let rest = blocks.remainder();
		self.buffer.as_mut()[..rest.len()].copy_from_slice(rest);
		self.buffer_len = rest.len();

		trace!(
			"{}: {} bytes processed, {} pending",
			A::ALGORITHM,
			self.processed,
			self.buffer_len
		);
		self.auto_finish();
	}

	fn auto_finish(&mut self) {
		if self.known_length == Some(self.total_len()) {
			self.finish();
		}
	}

	/// Pad the message and fold the final block(s). Idempotent.
	pub fn finish(&mut self) {
		if self.finalized {
			return;
		}
		let block_size = A::BLOCK_SIZE;
		let length_offset = block_size - LENGTH_FIELD_SIZE;
		let message_len = self.total_len();
		let bit_length = message_len.wrapping_mul(8);
		let buffer = self.buffer.as_mut();

		// Append 1 bit
		buffer[self.buffer_len] = PADDING_MARKER;
		let mut used = self.buffer_len + 1;

		// Not enough room left for the length field
		if used > length_offset {
			buffer[used..].fill(0);
			A::compress(&mut self.state, buffer);
			used = 0;
		}

		buffer[used..length_offset].fill(0);
		A::Endian::write_u64(&mut buffer[length_offset..], bit_length);
		A::compress(&mut self.state, buffer);

		self.processed = message_len;
		self.buffer_len = 0;
		self.finalized = true;
		trace!(
			"{}: finalized after {} bytes",
			A::ALGORITHM,
			message_len
		);
	}

	/// Return to the freshly constructed state.
	pub fn reset(&mut self) {
		*self = Self::new();
	}

	/// The digest, available once the context is finalized.
	pub fn digest(&self) -> Option<A::Digest> {
		self.finalized.then(|| A::output(&self.state))
	}

	/// Finish the context and return its digest.
	pub fn finalize(&mut self) -> A::Digest {
		self.finish();
		A::output(&self.state)
	}
}

impl<A: HashAlgorithm> Default for DigestContext<A> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A: HashAlgorithm> Clone for DigestContext<A> {
	fn clone(&self) -> Self {
		Self {
			state: self.state,
			processed: self.processed,
			buffer: self.buffer.clone(),
			buffer_len: self.buffer_len,
			known_length: self.known_length,
			finalized: self.finalized,
			_algorithm: PhantomData,
		}
	}
}

impl<A: HashAlgorithm> fmt::Debug for DigestContext<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DigestContext")
			.field("algorithm", &A::ALGORITHM)
			.field("state", &self.state)
			.field("processed", &self.processed)
			.field("buffer_len", &self.buffer_len)
			.field("known_length", &self.known_length)
			.field("finalized", &self.finalized)
			.finish()
	}
}

/// One-shot digest of an in-memory message.
pub fn compute<A: HashAlgorithm>(input: &[u8]) -> A::Digest {
	let mut context = DigestContext::<A>::new();
	context.chomp(input);
	context.finalize()
}

/// Object-safe view of a [`DigestContext`], used when the algorithm is
/// chosen at runtime.
pub trait DynContext: fmt::Debug {
	fn algorithm(&self) -> Algorithm;
	fn chomp(&mut self, input: &[u8]);
	fn finish(&mut self);
	fn reset(&mut self);
	fn set_known_length(&mut self, length: u64);
	fn is_finalized(&self) -> bool;
	fn total_len(&self) -> u64;
	fn digest_bytes(&self) -> Option<Vec<u8>>;
	fn finalize_bytes(&mut self) -> Vec<u8>;
}

impl<A: HashAlgorithm + 'static> DynContext for DigestContext<A> {
	fn algorithm(&self) -> Algorithm {
		A::ALGORITHM
	}

	fn chomp(&mut self, input: &[u8]) {
		DigestContext::chomp(self, input)
	}

	fn finish(&mut self) {
		DigestContext::finish(self)
	}

	fn reset(&mut self) {
		DigestContext::reset(self)
	}

	fn set_known_length(&mut self, length: u64) {
		DigestContext::set_known_length(self, length)
	}

	fn is_finalized(&self) -> bool {
		self.finalized
	}

	fn total_len(&self) -> u64 {
		DigestContext::total_len(self)
	}

	fn digest_bytes(&self) -> Option<Vec<u8>> {
		self.digest().map(|digest| digest.as_ref().to_vec())
	}

	fn finalize_bytes(&mut self) -> Vec<u8> {
		self.finalize().as_ref().to_vec()
	}
}

/// Runtime-selected digest context, reused across inputs via `reset`.
#[derive(Debug)]
pub struct Hasher {
	context: Box<dyn DynContext>,
}

impl Hasher {
	pub fn new(algorithm: Algorithm) -> Self {
		let context: Box<dyn DynContext> = match algorithm {
			Algorithm::Md5 => Box::new(DigestContext::<Md5>::new()),
			Algorithm::Sha256 => {
				Box::new(DigestContext::<Sha256>::new())
			}
		};
		Self { context }
	}

	pub fn algorithm(&self) -> Algorithm {
		self.context.algorithm()
	}

	pub fn chomp(&mut self, input: &[u8]) {
		self.context.chomp(input);
	}

	pub fn finish(&mut self) {
		self.context.finish();
	}

	pub fn reset(&mut self) {
		self.context.reset();
	}

	pub fn set_known_length(&mut self, length: u64) {
		self.context.set_known_length(length);
	}

	pub fn is_finalized(&self) -> bool {
		self.context.is_finalized()
	}

	pub fn total_len(&self) -> u64 {
		self.context.total_len()
	}

	pub fn digest_bytes(&self) -> Option<Vec<u8>> {
		self.context.digest_bytes()
	}

	/// Finish the current input and return its digest.
	pub fn finalize(&mut self) -> Vec<u8> {
		self.context.finalize_bytes()
	}

	/// Hash a complete in-memory message, resetting the context first.
	///
	/// The message length is declared up front, so the context finalizes
	/// itself on the last byte; the explicit finalize covers the empty
	/// message and is a no-op otherwise.
	pub fn process_bytes(&mut self, data: &[u8]) -> Vec<u8> {
		self.reset();
		self.set_known_length(data.len() as u64);
		self.chomp(data);
		self.finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BLOCK: usize = 64;

	fn message(len: usize) -> Vec<u8> {
		(0..len).map(|i| (i % 251) as u8).collect()
	}

	fn chunked<A: HashAlgorithm>(
		data: &[u8],
		chunk: usize,
	) -> A::Digest {
		let mut context = DigestContext::<A>::new();
		for piece in data.chunks(chunk) {
			context.chomp(piece);
		}
		context.finalize()
	}

	#[test]
	fn boundary_independence() {
		let data = b"abcdef";
		let whole = compute::<Md5>(data);
		assert_eq!(chunked::<Md5>(data, 3), whole);
		assert_eq!(chunked::<Md5>(data, 1), whole);

		let data = message(3 * BLOCK + 17);
		for chunk in [1, 7, 63, 64, 65, 128, 1000] {
			assert_eq!(
				chunked::<Sha256>(&data, chunk),
				compute::<Sha256>(&data),
				"chunk size {}",
				chunk
			);
			assert_eq!(
				chunked::<Md5>(&data, chunk),
				compute::<Md5>(&data),
				"chunk size {}",
				chunk
			);
		}
	}

	#[test]
	fn pending_stays_below_block_size() {
		let mut context = DigestContext::<Md5>::new();
		context.chomp(&message(BLOCK - 1));
		assert_eq!(context.pending_len(), BLOCK - 1);
		assert_eq!(context.processed_bytes(), 0);

		context.chomp(&[0]);
		assert_eq!(context.pending_len(), 0);
		assert_eq!(context.processed_bytes(), BLOCK as u64);

		context.chomp(&message(2 * BLOCK + 5));
		assert_eq!(context.pending_len(), 5);
		assert_eq!(context.processed_bytes(), 3 * BLOCK as u64);
		assert_eq!(context.total_len(), 3 * BLOCK as u64 + 5);
	}

	#[test]
	fn empty_chunks_are_no_ops() {
		let mut context = DigestContext::<Sha256>::new();
		context.chomp(&[]);
		context.chomp(b"abc");
		context.chomp(&[]);
		assert_eq!(context.total_len(), 3);
		let digest = context.finalize();
		context.chomp(&[]);
		assert_eq!(context.digest(), Some(digest));
	}

	#[test]
	fn finish_is_idempotent() {
		let mut context = DigestContext::<Md5>::new();
		context.chomp(b"hello world");
		context.finish();
		let first = context.digest();
		context.finish();
		assert_eq!(context.digest(), first);
		assert_eq!(
			first.map(|d| d.to_string()).as_deref(),
			Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
		);
	}

	#[test]
	fn digest_requires_finish() {
		let mut context = DigestContext::<Sha256>::new();
		context.chomp(b"abc");
		assert!(context.digest().is_none());
		assert!(!context.is_finalized());
	}

	#[test]
	fn reset_matches_fresh_context() {
		let mut context = DigestContext::<Sha256>::new();
		context.chomp(&message(200));
		context.finish();
		context.reset();
		assert_eq!(context.total_len(), 0);
		assert!(!context.is_finalized());
		context.chomp(b"second input");
		assert_eq!(
			context.finalize(),
			compute::<Sha256>(b"second input")
		);
	}

	#[test]
	fn length_boundaries() {
		for len in [
			BLOCK - 9,
			BLOCK - 8,
			BLOCK - 1,
			BLOCK,
			BLOCK + 1,
			2 * BLOCK - 9,
			2 * BLOCK - 8,
			2 * BLOCK,
		] {
			let data = message(len);
			assert_eq!(chunked::<Md5>(&data, 1), compute::<Md5>(&data));
			assert_eq!(
				chunked::<Sha256>(&data, 5),
				compute::<Sha256>(&data)
			);
		}
	}

	#[test]
	fn known_length_auto_finalizes() {
		let mut context = DigestContext::<Md5>::with_known_length(11);
		context.chomp(b"hello ");
		assert!(!context.is_finalized());
		context.chomp(b"world");
		assert!(context.is_finalized());
		assert_eq!(
			context.digest().map(|d| d.to_string()).as_deref(),
			Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
		);
		// The explicit signal after auto-finalization changes nothing
		context.finish();
		assert_eq!(
			context.digest().map(|d| d.to_string()).as_deref(),
			Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
		);
	}

	#[test]
	fn zero_known_length_means_unknown() {
		let context = DigestContext::<Md5>::with_known_length(0);
		assert_eq!(context.known_length(), None);
	}

	#[test]
	#[should_panic(expected = "without reset")]
	fn chomp_after_finish_panics() {
		let mut context = DigestContext::<Md5>::new();
		context.chomp(b"a");
		context.finish();
		context.chomp(b"b");
	}

	#[test]
	#[should_panic(expected = "exceeds declared length")]
	fn chomp_past_known_length_panics() {
		let mut context = DigestContext::<Sha256>::with_known_length(2);
		context.chomp(b"abc");
	}

	#[test]
	fn hasher_reuses_context_across_inputs() {
		let mut hasher = Hasher::new(Algorithm::Md5);
		assert_eq!(hasher.algorithm(), Algorithm::Md5);
		let first = hasher.process_bytes(b"");
		let second = hasher.process_bytes(b"hello world");
		let third = hasher.process_bytes(b"");
		assert_eq!(hex::encode(&first), "d41d8cd98f00b204e9800998ecf8427e");
		assert_eq!(
			hex::encode(&second),
			"5eb63bbbe01eeed093cb22bb8f5acdc3"
		);
		assert_eq!(first, third);
	}

	#[test]
	fn hasher_streaming_matches_one_shot() {
		let data = message(1000);
		let mut hasher = Hasher::new(Algorithm::Sha256);
		for piece in data.chunks(97) {
			hasher.chomp(piece);
		}
		assert!(hasher.digest_bytes().is_none());
		hasher.finish();
		assert_eq!(
			hasher.digest_bytes(),
			Some(compute::<Sha256>(&data).as_ref().to_vec())
		);
	}
}
