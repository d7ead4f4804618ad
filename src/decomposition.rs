// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Split base field coordinates into scalar field limbs.
//!
//! A coordinate `c ∈ Fp` doesn't fit `Fr`, so it is absorbed by the hash as
//! the pair `(q, m)` with `c = q·r + m` and `0 ≤ m < r`.

use dusk_bls12_381::{BlsScalar, G1Affine};
use num_bigint::BigUint;

/// Byte length of a big endian base field element
pub const FP_BYTES: usize = 48;

/// Big endian encoding of the base field modulus `p`
pub const FP_MODULUS: [u8; FP_BYTES] = [
    0x1a, 0x01, 0x11, 0xea, 0x39, 0x7f, 0xe6, 0x9a, 0x4b, 0x1b, 0xa7, 0xb6,
    0x43, 0x4b, 0xac, 0xd7, 0x64, 0x77, 0x4b, 0x84, 0xf3, 0x85, 0x12, 0xbf,
    0x67, 0x30, 0xd2, 0xa0, 0xf6, 0xb0, 0xf6, 0x24, 0x1e, 0xab, 0xff, 0xfe,
    0xb1, 0x53, 0xff, 0xff, 0xb9, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xaa, 0xab,
];

/// Little endian `u64` limbs of the scalar field modulus `r`
pub const FR_MODULUS: [u64; 4] = [
    0xffffffff00000001,
    0x53bda402fffe5bfe,
    0x3339d80809a1d805,
    0x73eda753299d7d48,
];

/// A base field coordinate written as `quotient · r + remainder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    /// `⌊c / r⌋`, at most 126 bits
    pub quotient: BlsScalar,
    /// `c mod r`
    pub remainder: BlsScalar,
}

/// Base field modulus as an integer
pub fn fp_modulus() -> BigUint {
    BigUint::from_bytes_be(&FP_MODULUS)
}

/// Scalar field modulus as an integer
pub fn fr_modulus() -> BigUint {
    let bytes: Vec<u8> =
        FR_MODULUS.iter().flat_map(|l| l.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

/// Canonical integer value of a scalar
pub fn scalar_to_biguint(scalar: &BlsScalar) -> BigUint {
    BigUint::from_bytes_le(&scalar.to_bytes())
}

/// Reduce an integer into the scalar field
pub fn biguint_to_scalar(value: &BigUint) -> BlsScalar {
    let value = value % fr_modulus();
    let bytes = value.to_bytes_le();

    let mut wide = [0u8; 64];
    wide[..bytes.len()].copy_from_slice(&bytes);

    BlsScalar::from_bytes_wide(&wide)
}

/// Affine coordinates `(x, y)` as integers; the identity maps to `(0, 0)`.
pub fn coordinates(point: &G1Affine) -> (BigUint, BigUint) {
    let mut raw = point.to_uncompressed();

    // compression, infinity and sort flags
    raw[0] &= 0x1f;

    if bool::from(point.is_identity()) {
        return (BigUint::default(), BigUint::default());
    }

    let x = BigUint::from_bytes_be(&raw[..FP_BYTES]);
    let y = BigUint::from_bytes_be(&raw[FP_BYTES..]);

    (x, y)
}

/// Decompose a base field coordinate.
pub fn decompose(coordinate: &BigUint) -> Decomposition {
    let r = fr_modulus();

    let quotient = coordinate / &r;
    let remainder = coordinate % &r;

    Decomposition {
        quotient: biguint_to_scalar(&quotient),
        remainder: biguint_to_scalar(&remainder),
    }
}

/// Decompose both coordinates of a point, `[x, y]`.
pub fn decompose_g1(point: &G1Affine) -> [Decomposition; 2] {
    let (x, y) = coordinates(point);

    [decompose(&x), decompose(&y)]
}

/// `y > (p - 1) / 2`
pub fn is_lexicographically_largest(y: &BigUint) -> bool {
    let half = (fp_modulus() - 1u32) >> 1;
    y > &half
}
