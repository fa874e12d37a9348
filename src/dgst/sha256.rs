// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: sha256.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

use crate::dgst::algorithm::{
	define_block, define_digest, Algorithm, HashAlgorithm,
};
use byteorder::{BigEndian, ByteOrder};

define_block!(Sha256Block, 64);
define_digest!(Sha256Digest, 32);

const INITIAL_STATE: [u32; 8] = [
	0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f,
	0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

// Round constants
const K: [u32; 64] = [
	0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b,
	0x59f111f1, 0x923f82a4, 0xab1c5ed5, 0xd807aa98, 0x12835b01,
	0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7,
	0xc19bf174, 0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc,
	0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da, 0x983e5152,
	0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147,
	0x06ca6351, 0x14292967, 0x27b70a85, 0x2e1b2138, 0x4d2c6dfc,
	0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
	0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819,
	0xd6990624, 0xf40e3585, 0x106aa070, 0x19a4c116, 0x1e376c08,
	0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f,
	0x682e6ff3, 0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208,
	0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[derive(Copy, Clone, Debug, Default)]
pub struct Sha256;

impl HashAlgorithm for Sha256 {
	const ALGORITHM: Algorithm = Algorithm::Sha256;

	type Endian = BigEndian;
	type State = [u32; 8];
	type Block = Sha256Block;
	type Digest = Sha256Digest;

	const INITIAL_STATE: Self::State = INITIAL_STATE;

	fn compress(state: &mut Self::State, block: &[u8]) {
		// Message schedule
		let mut w = [0u32; 64];
		BigEndian::read_u32_into(block, &mut w[..16]);
		for i in 16..64 {
			let s0 = w[i - 15].rotate_right(7)
				^ w[i - 15].rotate_right(18)
				^ (w[i - 15] >> 3);
			let s1 = w[i - 2].rotate_right(17)
				^ w[i - 2].rotate_right(19)
				^ (w[i - 2] >> 10);
			w[i] = w[i - 16]
				.wrapping_add(s0)
				.wrapping_add(w[i - 7])
				.wrapping_add(s1);
		}

		let mut h = *state;

		let choose = |x: u32, y: u32, z: u32| (x & y) | (!x & z);
		let majority =
			|x: u32, y: u32, z: u32| (x & y) | (y & z) | (x & z);

		for i in 0..64 {
			let s1 = h[4].rotate_right(6)
				^ h[4].rotate_right(11)
				^ h[4].rotate_right(25);
			let temp1 = h[7]
				.wrapping_add(s1)
				.wrapping_add(choose(h[4], h[5], h[6]))
				.wrapping_add(K[i])
				.wrapping_add(w[i]);
			let s0 = h[0].rotate_right(2)
				^ h[0].rotate_right(13)
				^ h[0].rotate_right(22);
			let temp2 = s0.wrapping_add(majority(h[0], h[1], h[2]));

			h.copy_within(0..7, 1);
			h[4] = h[4].wrapping_add(temp1);
			h[0] = temp1.wrapping_add(temp2);
		}

		for (word, working) in state.iter_mut().zip(h) {
			*word = word.wrapping_add(working);
		}
	}
}
