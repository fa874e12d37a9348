// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: algorithm.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

//! Algorithm descriptors shared by every digest context.
//!
//! A descriptor is a stateless type implementing [`HashAlgorithm`]: it
//! carries the block and digest sizes, the byte order used for message
//! words and the length field, the initial state vector and the
//! compression function. Contexts are generic over the descriptor, so the
//! choice of algorithm is made once at construction time.

use byteorder::ByteOrder;
use std::fmt::{self, Debug};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Size in bytes of the message length field appended during padding.
pub const LENGTH_FIELD_SIZE: usize = 8;

/// Marker byte holding the single `1` bit that starts the padding.
pub const PADDING_MARKER: u8 = 0x80;

/// A fixed-size input block buffer.
pub trait Block: AsRef<[u8]> + AsMut<[u8]> + Clone + Debug {
	const LEN: usize;

	fn zeroed() -> Self;
}

/// A fixed-size digest value.
pub trait Digest:
	AsRef<[u8]> + AsMut<[u8]> + Copy + Debug + Eq + fmt::Display
{
	const LEN: usize;

	fn zeroed() -> Self;
}

/// Capability implemented by each supported digest algorithm.
pub trait HashAlgorithm {
	/// Runtime identifier of this descriptor.
	const ALGORITHM: Algorithm;

	/// Order of message words, state words and the length field.
	type Endian: ByteOrder;
	/// Running hash state.
	type State: AsRef<[u32]> + Copy + Debug + Eq;
	type Block: Block;
	type Digest: Digest;

	const INITIAL_STATE: Self::State;
	const BLOCK_SIZE: usize = <Self::Block as Block>::LEN;
	const DIGEST_SIZE: usize = <Self::Digest as Digest>::LEN;

	/// Fold exactly one block into `state`.
	fn compress(state: &mut Self::State, block: &[u8]);

	/// Serialize the state words, in state order, into a digest.
	fn output(state: &Self::State) -> Self::Digest {
		let mut digest = Self::Digest::zeroed();
		Self::Endian::write_u32_into(state.as_ref(), digest.as_mut());
		digest
	}
}

macro_rules! define_block {
	($block:ident, $size:expr) => {
		#[derive(Copy, Clone)]
		pub struct $block([u8; $size]);

		impl AsRef<[u8]> for $block {
			fn as_ref(&self) -> &[u8] {
				&self.0
			}
		}

		impl AsMut<[u8]> for $block {
			fn as_mut(&mut self) -> &mut [u8] {
				&mut self.0
			}
		}

		impl ::std::fmt::Debug for $block {
			fn fmt(
				&self,
				f: &mut ::std::fmt::Formatter<'_>,
			) -> ::std::fmt::Result {
				write!(
					f,
					"{}({})",
					stringify!($block),
					$crate::dgst::present::to_hex(&self.0)
				)
			}
		}

		impl $crate::dgst::algorithm::Block for $block {
			const LEN: usize = $size;

			fn zeroed() -> Self {
				$block([0; $size])
			}
		}
	};
}

macro_rules! define_digest {
	($digest:ident, $size:expr) => {
		#[derive(Copy, Clone, PartialEq, Eq, Hash)]
		pub struct $digest([u8; $size]);

		impl $digest {
			pub fn into_bytes(self) -> [u8; $size] {
				self.0
			}
		}

		impl AsRef<[u8]> for $digest {
			fn as_ref(&self) -> &[u8] {
				&self.0
			}
		}

		impl AsMut<[u8]> for $digest {
			fn as_mut(&mut self) -> &mut [u8] {
				&mut self.0
			}
		}

		impl From<$digest> for Vec<u8> {
			fn from(digest: $digest) -> Vec<u8> {
				digest.0.to_vec()
			}
		}

		impl ::std::fmt::Debug for $digest {
			fn fmt(
				&self,
				f: &mut ::std::fmt::Formatter<'_>,
			) -> ::std::fmt::Result {
				write!(f, "{}(\"{}\")", stringify!($digest), self)
			}
		}

		impl ::std::fmt::Display for $digest {
			fn fmt(
				&self,
				f: &mut ::std::fmt::Formatter<'_>,
			) -> ::std::fmt::Result {
				f.write_str(&$crate::dgst::present::to_hex(&self.0))
			}
		}

		impl $crate::dgst::algorithm::Digest for $digest {
			const LEN: usize = $size;

			fn zeroed() -> Self {
				$digest([0; $size])
			}
		}
	};
}

pub(crate) use define_block;
pub(crate) use define_digest;

/// Runtime algorithm selector used by the command line.
#[derive(
	Copy,
	Clone,
	Debug,
	PartialEq,
	Eq,
	Hash,
	EnumIter,
	EnumString,
	IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Algorithm {
	Md5,
	Sha256,
}

impl Algorithm {
	/// Lowercase command name (e.g. `sha256`).
	pub fn id(self) -> &'static str {
		self.into()
	}

	/// Upper-case label used in digest lines (e.g. `SHA256`).
	pub fn display_name(self) -> &'static str {
		match self {
			Algorithm::Md5 => "MD5",
			Algorithm::Sha256 => "SHA256",
		}
	}

	pub fn about(self) -> &'static str {
		match self {
			Algorithm::Md5 => "Compute MD5 message digests",
			Algorithm::Sha256 => "Compute SHA-256 message digests",
		}
	}

	pub fn block_size(self) -> usize {
		match self {
			Algorithm::Md5 => crate::dgst::md5::Md5::BLOCK_SIZE,
			Algorithm::Sha256 => {
				crate::dgst::sha256::Sha256::BLOCK_SIZE
			}
		}
	}

	pub fn digest_size(self) -> usize {
		match self {
			Algorithm::Md5 => crate::dgst::md5::Md5::DIGEST_SIZE,
			Algorithm::Sha256 => {
				crate::dgst::sha256::Sha256::DIGEST_SIZE
			}
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.display_name())
	}
}
