// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: md5.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

//! MD5 [RFC 1321](https://datatracker.ietf.org/doc/html/rfc1321) descriptor.

use crate::dgst::algorithm::{
	define_block, define_digest, Algorithm, HashAlgorithm,
};
use byteorder::{ByteOrder, LittleEndian};

define_block!(Md5Block, 64);
define_digest!(Md5Digest, 16);

const INITIAL_STATE: [u32; 4] =
	[0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

// Per-round left-rotate amounts
const S: [u32; 64] = [
	7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9,
	14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4,
	11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15, 21, 6, 10, 15,
	21, 6, 10, 15, 21, 6, 10, 15, 21,
];

// floor(abs(sin(i + 1)) * 2^32)
const K: [u32; 64] = [
	0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf,
	0x4787c62a, 0xa8304613, 0xfd469501, 0x698098d8, 0x8b44f7af,
	0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e,
	0x49b40821, 0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
	0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8, 0x21e1cde6,
	0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8,
	0x676f02d9, 0x8d2a4c8a, 0xfffa3942, 0x8771f681, 0x6d9d6122,
	0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
	0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039,
	0xe6db99e5, 0x1fa27cf8, 0xc4ac5665, 0xf4292244, 0x432aff97,
	0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d,
	0x85845dd1, 0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
	0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

#[derive(Copy, Clone, Debug, Default)]
pub struct Md5;

impl HashAlgorithm for Md5 {
	const ALGORITHM: Algorithm = Algorithm::Md5;

	type Endian = LittleEndian;
	type State = [u32; 4];
	type Block = Md5Block;
	type Digest = Md5Digest;

	const INITIAL_STATE: Self::State = INITIAL_STATE;

	fn compress(state: &mut Self::State, block: &[u8]) {
		let mut words = [0u32; 16];
		LittleEndian::read_u32_into(block, &mut words);

		let [mut a, mut b, mut c, mut d] = *state;

		for i in 0..64 {
			let (f, g) = match i {
				0..=15 => ((b & c) | (!b & d), i),
				16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
				32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
				_ => (c ^ (b | !d), (7 * i) % 16),
			};
			let rotated = a
				.wrapping_add(f)
				.wrapping_add(K[i])
				.wrapping_add(words[g])
				.rotate_left(S[i]);

			a = d;
			d = c;
			c = b;
			b = b.wrapping_add(rotated);
		}

		state[0] = state[0].wrapping_add(a);
		state[1] = state[1].wrapping_add(b);
		state[2] = state[2].wrapping_add(c);
		state[3] = state[3].wrapping_add(d);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dgst::engine::compute;

	fn test_md5(input: &[u8], expected: &str) {
		let actual = compute::<Md5>(input);
		assert_eq!(actual.to_string(), expected, "input {:?}", input);
	}

	#[test]
	fn rfc1321_suite() {
		test_md5(b"", "d41d8cd98f00b204e9800998ecf8427e");
		test_md5(b"a", "0cc175b9c0f1b6a831c399e269772661");
		test_md5(b"abc", "900150983cd24fb0d6963f7d28e17f72");
		test_md5(b"message digest", "f96b697d7cb7938d525a2f31aaf161d0");
		test_md5(
			b"abcdefghijklmnopqrstuvwxyz",
			"c3fcd3d76192e4007dfb496cca67e13b",
		);
		test_md5(
			b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
			"d174ab98d277d9f5a5611c2c9f419d9f",
		);
		test_md5(
			b"12345678901234567890123456789012345678901234567890123456789012345678901234567890",
			"57edf4a22be3c955ac49da2e2107b67a",
		);
	}

	#[test]
	fn hello_world() {
		test_md5(b"hello world", "5eb63bbbe01eeed093cb22bb8f5acdc3");
	}

	#[test]
	fn compress_wraps_instead_of_overflowing() {
		let mut state = [u32::MAX; 4];
		Md5::compress(&mut state, &[0xff; 64]);
		assert_ne!(state, [u32::MAX; 4]);
	}

	#[test]
	fn output_is_little_endian() {
		let digest = Md5::output(&INITIAL_STATE);
		assert_eq!(
			digest.to_string(),
			"0123456789abcdeffedcba9876543210"
		);
	}
}
