// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Arithmetization of the Poseidon2 permutation.
//!
//! Every step mirrors [`Poseidon2Params::permute`] so the circuit computes
//! the exact same outputs as the native hash.

use dusk_bls12_381::BlsScalar;

use super::{Composer, Constraint, Witness};
use crate::error::Error;
use crate::hash::{Hasher, Poseidon2Params};

impl Composer {
    /// Poseidon2 permutation of `state`.
    pub fn component_poseidon2(
        &mut self,
        params: &Poseidon2Params,
        state: &[Witness],
    ) -> Result<Vec<Witness>, Error> {
        if state.len() != params.width() {
            return Err(Error::InvalidStateWidth {
                expected: params.width(),
                provided: state.len(),
            });
        }

        Ok(self.apply_poseidon2(params, state.to_vec()))
    }

    /// Permutation over a state of the right width
    fn apply_poseidon2(
        &mut self,
        params: &Poseidon2Params,
        mut state: Vec<Witness>,
    ) -> Vec<Witness> {
        let external = vec![BlsScalar::one(); state.len()];
        let mut internal = external.clone();
        if let Some(last) = internal.last_mut() {
            *last = BlsScalar::from(2u64);
        }

        self.linear_layer(&mut state, &external);

        for round in 0..params.rounds() {
            let keys = params.round_keys(round);

            if params.is_full_round(round) {
                state
                    .iter_mut()
                    .zip(keys)
                    .for_each(|(s, k)| *s = self.keyed_sbox(*s, k));

                self.linear_layer(&mut state, &external);
            } else {
                state[0] = self.keyed_sbox(state[0], &keys[0]);

                self.linear_layer(&mut state, &internal);
            }
        }

        state
    }

    /// `P([a, b])[1] + b`
    pub fn component_compress(
        &mut self,
        hasher: &Hasher,
        a: Witness,
        b: Witness,
    ) -> Witness {
        // the width is checked when the hasher is built
        let state = self.apply_poseidon2(hasher.params(), vec![a, b]);

        let constraint = Constraint::new().left(1).right(1).a(state[1]).b(b);
        self.gate_add(constraint)
    }

    /// Fold `values` with [`Self::component_compress`] starting from zero.
    pub fn component_sum(
        &mut self,
        hasher: &Hasher,
        values: &[Witness],
    ) -> Witness {
        values.iter().fold(Self::ZERO, |acc, v| {
            self.component_compress(hasher, acc, *v)
        })
    }

    /// `(x + k)^5` in three gates
    fn keyed_sbox(&mut self, x: Witness, k: &BlsScalar) -> Witness {
        // (x + k)^2 = x^2 + 2k·x + k^2
        let constraint = Constraint::new()
            .mult(1)
            .left(k.double())
            .constant(k.square())
            .a(x)
            .b(x);
        let x2 = self.gate_mul(constraint);

        let constraint = Constraint::new().mult(1).a(x2).b(x2);
        let x4 = self.gate_mul(constraint);

        // (x + k)^4 · (x + k)
        let constraint = Constraint::new().mult(1).left(*k).a(x4).b(x);
        self.gate_mul(constraint)
    }

    /// `s_i = d_i·s_i + Σ s_j`
    fn linear_layer(&mut self, state: &mut [Witness], diag: &[BlsScalar]) {
        let one = BlsScalar::one();

        if let [a, b] = state {
            let (x, y) = (*a, *b);

            let constraint = Constraint::new().left(diag[0] + one).right(1);
            *a = self.gate_add(constraint.a(x).b(y));

            let constraint = Constraint::new().left(1).right(diag[1] + one);
            *b = self.gate_add(constraint.a(x).b(y));

            return;
        }

        let terms: Vec<_> = state.iter().map(|s| (one, *s)).collect();
        let sum = self.component_linear_combination(&terms, BlsScalar::zero());

        state.iter_mut().zip(diag).for_each(|(s, d)| {
            let constraint = Constraint::new().left(*d).right(1).a(*s).b(sum);
            *s = self.gate_add(constraint);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ff::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::HashConfig;

    fn check_permutation(width: usize) {
        let config = HashConfig {
            width,
            ..HashConfig::default()
        };
        let params = Poseidon2Params::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(0xcafe + width as u64);

        let mut native: Vec<_> =
            (0..width).map(|_| BlsScalar::random(&mut rng)).collect();

        let mut composer = Composer::initialized();
        let state: Vec<_> =
            native.iter().map(|s| composer.append_witness(*s)).collect();

        let out = composer.component_poseidon2(&params, &state).unwrap();
        params.permute(&mut native).unwrap();

        let out: Vec<_> = out.iter().map(|w| composer[*w]).collect();
        assert_eq!(out, native);
        assert_eq!(composer.unsatisfied_row(), None);
    }

    #[test]
    fn permutation_matches_native_width_two() {
        check_permutation(2);
    }

    #[test]
    fn permutation_matches_native_width_three() {
        check_permutation(3);
    }

    #[test]
    fn compress_and_sum_match_native() {
        let hasher = Hasher::default();
        let mut rng = StdRng::seed_from_u64(0xbeef);

        let values: Vec<_> =
            (0..3).map(|_| BlsScalar::random(&mut rng)).collect();

        let mut composer = Composer::initialized();
        let witnesses: Vec<_> =
            values.iter().map(|v| composer.append_witness(*v)).collect();

        let c =
            composer.component_compress(&hasher, witnesses[0], witnesses[1]);
        let s = composer.component_sum(&hasher, &witnesses);
        let empty = composer.component_sum(&hasher, &[]);

        assert_eq!(composer[c], hasher.compress(&values[0], &values[1]));
        assert_eq!(composer[s], hasher.sum(&values));
        assert_eq!(composer[empty], BlsScalar::zero());
        assert_eq!(composer.unsatisfied_row(), None);
    }

    #[test]
    fn compress_follows_the_configured_hasher() {
        let config = HashConfig {
            partial_rounds: 20,
            seed: "compress gadget".into(),
            ..HashConfig::default()
        };
        let hasher = Hasher::from_config(&config).unwrap();
        assert_ne!(&hasher, &Hasher::default());

        let (a, b) = (BlsScalar::from(3u64), BlsScalar::from(4u64));
        let mut composer = Composer::initialized();
        let w_a = composer.append_witness(a);
        let w_b = composer.append_witness(b);
        let out = composer.component_compress(&hasher, w_a, w_b);

        assert_eq!(composer[out], hasher.compress(&a, &b));
        assert_ne!(composer[out], Hasher::default().compress(&a, &b));
        assert_eq!(composer.unsatisfied_row(), None);

        // wider parameters never reach the compression
        let wide = HashConfig {
            width: 3,
            ..HashConfig::default()
        };
        assert_eq!(Hasher::from_config(&wide), Err(Error::UnsupportedWidth(3)));
    }

    #[test]
    fn tampered_state_is_unsatisfied() {
        let hasher = Hasher::default();

        let mut composer = Composer::initialized();
        let a = composer.append_witness(1);
        let b = composer.append_witness(2);
        let out = composer.component_compress(&hasher, a, b);
        assert_eq!(composer.unsatisfied_row(), None);

        composer.witnesses[out.index()] += BlsScalar::one();
        assert!(composer.unsatisfied_row().is_some());
    }

    #[test]
    fn malformed_state_is_rejected() {
        let params = Poseidon2Params::default();
        let mut composer = Composer::initialized();

        assert_eq!(
            composer.component_poseidon2(&params, &[Composer::ONE]),
            Err(Error::InvalidStateWidth {
                expected: 2,
                provided: 1
            })
        );
    }
}
