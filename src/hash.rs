// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Algebraic hash of the protocol.
//!
//! A width-2 Poseidon2 permutation drives a compression function
//! `Compress(a, b) = P([a, b])[1] + b`, folded by [`Hasher::sum`] and used to
//! absorb curve points through their [`decomposition`](crate::decomposition).

use std::sync::Arc;

use dusk_bls12_381::{BlsScalar, G1Affine};

use crate::config::HashConfig;
use crate::decomposition;
use crate::error::Error;

mod poseidon2;

pub use poseidon2::{Poseidon2Params, SBOX_DEGREE};

/// Compression and point hashing over shared Poseidon2 parameters.
///
/// Cloning is cheap; every clone reads the same immutable round keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hasher {
    params: Arc<Poseidon2Params>,
}

impl Hasher {
    /// Wrap width-2 parameters.
    pub fn new(params: Arc<Poseidon2Params>) -> Result<Self, Error> {
        match params.width() {
            2 => Ok(Self { params }),
            w => Err(Error::UnsupportedWidth(w)),
        }
    }

    /// Derive the parameters from a configuration.
    pub fn from_config(config: &HashConfig) -> Result<Self, Error> {
        Poseidon2Params::new(config).map(Arc::new).and_then(Self::new)
    }

    /// Underlying permutation parameters
    pub fn params(&self) -> &Arc<Poseidon2Params> {
        &self.params
    }

    /// `P([a, b])[1] + b`
    pub fn compress(&self, a: &BlsScalar, b: &BlsScalar) -> BlsScalar {
        let mut state = [*a, *b];

        // the width is checked at construction
        self.params.apply(&mut state);

        state[1] + b
    }

    /// Fold `values` with [`Self::compress`] starting from zero.
    ///
    /// The empty sum is zero.
    pub fn sum<'a, I>(&self, values: I) -> BlsScalar
    where
        I: IntoIterator<Item = &'a BlsScalar>,
    {
        values
            .into_iter()
            .fold(BlsScalar::zero(), |acc, v| self.compress(&acc, v))
    }

    /// `Compress(Compress(xq, xm), Compress(yq, ym))`
    pub fn hash_g1(&self, point: &G1Affine) -> BlsScalar {
        let [x, y] = decomposition::decompose_g1(point);

        let x = self.compress(&x.quotient, &x.remainder);
        let y = self.compress(&y.quotient, &y.remainder);

        self.compress(&x, &y)
    }

    /// Compact digest of a commitment: `Compress(xq, ±xm)`, negating the
    /// remainder when `y` is lexicographically largest.
    pub fn digest_hash(&self, point: &G1Affine) -> BlsScalar {
        let (x, y) = decomposition::coordinates(point);
        let x = decomposition::decompose(&x);

        let remainder = if decomposition::is_lexicographically_largest(&y) {
            -x.remainder
        } else {
            x.remainder
        };

        self.compress(&x.quotient, &remainder)
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            params: Arc::new(Poseidon2Params::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ff::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_sum_is_zero() {
        let hasher = Hasher::default();

        assert_eq!(hasher.sum(&[]), BlsScalar::zero());
    }

    #[test]
    fn sum_folds_compress() {
        let hasher = Hasher::default();
        let mut rng = StdRng::seed_from_u64(0x5a);

        let v: Vec<_> = (0..3).map(|_| BlsScalar::random(&mut rng)).collect();

        let first = hasher.compress(&BlsScalar::zero(), &v[0]);
        let second = hasher.compress(&first, &v[1]);
        let expected = hasher.compress(&second, &v[2]);

        assert_eq!(hasher.sum(&v), expected);
        assert_eq!(hasher.sum(&v), hasher.sum(v.iter()));
    }

    #[test]
    fn compress_is_order_sensitive() {
        let hasher = Hasher::default();
        let a = BlsScalar::from(1u64);
        let b = BlsScalar::from(2u64);

        assert_eq!(hasher.compress(&a, &b), hasher.compress(&a, &b));
        assert_ne!(hasher.compress(&a, &b), hasher.compress(&b, &a));
    }

    #[test]
    fn width_three_is_not_a_compression_hasher() {
        let config = HashConfig {
            width: 3,
            ..HashConfig::default()
        };

        assert_eq!(
            Hasher::from_config(&config),
            Err(Error::UnsupportedWidth(3))
        );
    }

    #[test]
    fn point_hashes_distinguish_points() {
        let hasher = Hasher::default();
        let g = G1Affine::generator();
        let neg_g = -g;

        assert_ne!(hasher.hash_g1(&g), hasher.hash_g1(&neg_g));
        assert_ne!(hasher.digest_hash(&g), hasher.digest_hash(&neg_g));
        assert_eq!(hasher.hash_g1(&g), hasher.hash_g1(&g));
    }
}
