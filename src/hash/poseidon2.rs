// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;
use sha3::{Digest, Keccak256};

use crate::config::HashConfig;
use crate::error::Error;

/// Exponent of the S-box; the smallest `d` with `gcd(d, r - 1) = 1`.
pub const SBOX_DEGREE: u64 = 5;

/// Immutable Poseidon2 parameters: round counts and the derived round keys.
///
/// Build it once and share it by reference; the in-circuit gadget reads the
/// very same keys so both sides compute bit-identical permutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poseidon2Params {
    width: usize,
    full_rounds: usize,
    partial_rounds: usize,
    round_keys: Vec<Vec<BlsScalar>>,
}

impl Poseidon2Params {
    /// Derive the parameters for the given configuration.
    ///
    /// Only widths 2 and 3 have a defined linear layer; full rounds must be
    /// even and non-zero.
    pub fn new(config: &HashConfig) -> Result<Self, Error> {
        if config.width != 2 && config.width != 3 {
            return Err(Error::UnsupportedWidth(config.width));
        }
        if config.full_rounds == 0 || config.full_rounds % 2 != 0 {
            return Err(Error::UnsupportedFullRounds(config.full_rounds));
        }

        let round_keys = round_keys(
            config.seed.as_bytes(),
            config.width,
            config.full_rounds,
            config.partial_rounds,
        );

        Ok(Self {
            width: config.width,
            full_rounds: config.full_rounds,
            partial_rounds: config.partial_rounds,
            round_keys,
        })
    }

    /// State width `t`
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of full rounds
    pub fn full_rounds(&self) -> usize {
        self.full_rounds
    }

    /// Number of partial rounds
    pub fn partial_rounds(&self) -> usize {
        self.partial_rounds
    }

    /// Keys added at round `round`; partial rounds carry a single key.
    pub fn round_keys(&self, round: usize) -> &[BlsScalar] {
        &self.round_keys[round]
    }

    /// Whether `round` applies the S-box to every lane.
    pub fn is_full_round(&self, round: usize) -> bool {
        let half = self.full_rounds / 2;
        round < half || round >= half + self.partial_rounds
    }

    /// Total number of rounds
    pub fn rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// Apply the permutation to `state` in place.
    pub fn permute(&self, state: &mut [BlsScalar]) -> Result<(), Error> {
        if state.len() != self.width {
            return Err(Error::InvalidStateWidth {
                expected: self.width,
                provided: state.len(),
            });
        }

        self.apply(state);

        Ok(())
    }

    /// Permutation over a state of the right width
    pub(crate) fn apply(&self, state: &mut [BlsScalar]) {
        external_layer(state);

        for round in 0..self.rounds() {
            let keys = self.round_keys(round);
            state.iter_mut().zip(keys).for_each(|(s, k)| *s += k);

            if self.is_full_round(round) {
                state.iter_mut().for_each(sbox);
                external_layer(state);
            } else {
                sbox(&mut state[0]);
                internal_layer(state);
            }
        }
    }
}

impl Default for Poseidon2Params {
    fn default() -> Self {
        let config = HashConfig::default();
        let round_keys = round_keys(
            config.seed.as_bytes(),
            config.width,
            config.full_rounds,
            config.partial_rounds,
        );

        Self {
            width: config.width,
            full_rounds: config.full_rounds,
            partial_rounds: config.partial_rounds,
            round_keys,
        }
    }
}

/// `x^5`
pub(crate) fn sbox(x: &mut BlsScalar) {
    let x2 = x.square();
    let x4 = x2.square();
    *x *= x4;
}

/// External linear layer; `circ(2, 1)` for `t = 2` and `circ(2, 1, 1)` for
/// `t = 3`.
pub(crate) fn external_layer(state: &mut [BlsScalar]) {
    let sum = state.iter().fold(BlsScalar::zero(), |acc, s| acc + s);
    state.iter_mut().for_each(|s| *s += sum);
}

/// Internal linear layer; `1 + diag(1, 2)` for `t = 2`, `1 + diag(1, 1, 2)`
/// for `t = 3`.
pub(crate) fn internal_layer(state: &mut [BlsScalar]) {
    let sum = state.iter().fold(BlsScalar::zero(), |acc, s| acc + s);
    let last = state.len() - 1;
    state.iter_mut().enumerate().for_each(|(i, s)| {
        if i == last {
            *s = s.double() + sum;
        } else {
            *s += sum;
        }
    });
}

/// Round keys derived from a Keccak-256 chain over the seed.
///
/// The first digest hashes the seed; each key is the next digest of the
/// chain, read as a big endian integer and reduced modulo `r`.
fn round_keys(
    seed: &[u8],
    width: usize,
    full_rounds: usize,
    partial_rounds: usize,
) -> Vec<Vec<BlsScalar>> {
    let mut rnd = Keccak256::digest(seed);

    let half = full_rounds / 2;
    (0..full_rounds + partial_rounds)
        .map(|round| {
            let full = round < half || round >= half + partial_rounds;
            let len = if full { width } else { 1 };

            (0..len)
                .map(|_| {
                    rnd = Keccak256::digest(rnd.as_slice());

                    let mut wide = [0u8; 64];
                    wide[..32].copy_from_slice(rnd.as_slice());
                    wide[..32].reverse();

                    BlsScalar::from_bytes_wide(&wide)
                })
                .collect()
        })
        .collect()
}
