// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! In-circuit checks of the point decomposition hints.
//!
//! A coordinate `c ∈ Fp` is carried as six 64 bits limbs. The hint
//! `(q, m)` is accepted when `m < r`, `c < p` and the integer identity
//! `c = m + q·r` holds limb by limb with range checked carries. Every limb
//! sum stays far below `r`, so the identity can't wrap around the scalar
//! field.

use dusk_bls12_381::{BlsScalar, G1Affine};
use num_bigint::BigUint;

use super::{Composer, Witness};
use crate::decomposition::{
    self, biguint_to_scalar, fp_modulus, fr_modulus, scalar_to_biguint,
    Decomposition, FR_MODULUS,
};
use crate::hash::Hasher;

const LIMB_BITS: usize = 64;
const FP_LIMBS: usize = 6;
const FR_BITS: usize = 255;
const QUOTIENT_BITS: usize = 127;
const CARRY_BITS: usize = 68;

impl Composer {
    /// `HashG1(point)`, absorbing both coordinates through their checked
    /// decompositions
    pub fn component_hash_g1(
        &mut self,
        hasher: &Hasher,
        point: &G1Affine,
    ) -> Witness {
        let (x, y) = decomposition::coordinates(point);

        let (xq, xm) = self.component_coordinate(&x);
        let (yq, ym) = self.component_coordinate(&y);

        let x = self.component_compress(hasher, xq, xm);
        let y = self.component_compress(hasher, yq, ym);

        self.component_compress(hasher, x, y)
    }

    /// Checked decomposition `(q, m)` of a base field coordinate
    pub fn component_coordinate(
        &mut self,
        coordinate: &BigUint,
    ) -> (Witness, Witness) {
        let hint = decomposition::decompose(coordinate);

        self.coordinate_with_hint(coordinate, &hint)
    }

    pub(crate) fn coordinate_with_hint(
        &mut self,
        coordinate: &BigUint,
        hint: &Decomposition,
    ) -> (Witness, Witness) {
        // c < p
        let mut c = Vec::with_capacity(FP_LIMBS);
        let mut c_bits = Vec::with_capacity(FP_LIMBS * LIMB_BITS);
        for limb in limbs(coordinate, FP_LIMBS) {
            let w = self.append_witness(limb);
            c_bits.extend(self.component_bits(w, LIMB_BITS));
            c.push(w);
        }
        self.assert_less_than_constant(&c_bits, &fp_modulus());

        // m < r
        let m = self.append_witness(hint.remainder);
        let (m, m_bits) = self.component_limbs(m, FR_BITS);
        self.assert_less_than_constant(&m_bits, &fr_modulus());

        // q < 2^127
        let q = self.append_witness(hint.quotient);
        let (q, _) = self.component_limbs(q, QUOTIENT_BITS);

        self.assert_limbs_identity(&c, &m, &q);

        (q.value, m.value)
    }

    /// Split `value` into 64 bits limbs covering `bits` bits, returning the
    /// limbs and the constrained bits
    fn component_limbs(
        &mut self,
        value: Witness,
        bits: usize,
    ) -> (Limbs, Vec<Witness>) {
        let integer = scalar_to_biguint(&self[value]);
        let count = bits.div_ceil(LIMB_BITS);

        let mut limbs_w = Vec::with_capacity(count);
        let mut all_bits = Vec::with_capacity(bits);
        let mut terms = Vec::with_capacity(count);
        let mut shift = BlsScalar::one();
        let base = BlsScalar::from(u64::MAX) + BlsScalar::one();

        for (i, limb) in limbs(&integer, count).into_iter().enumerate() {
            let width = (bits - i * LIMB_BITS).min(LIMB_BITS);

            let w = self.append_witness(limb);
            all_bits.extend(self.component_bits(w, width));
            limbs_w.push(w);

            terms.push((shift, w));
            shift *= base;
        }

        let sum = self.component_linear_combination(&terms, BlsScalar::zero());
        self.assert_equal(sum, value);

        let limbs = Limbs {
            value,
            limbs: limbs_w,
        };

        (limbs, all_bits)
    }

    /// `Σ c_k·2^64k = Σ m_k·2^64k + (Σ q_i·2^64i)·(Σ r_j·2^64j)`
    fn assert_limbs_identity(&mut self, c: &[Witness], m: &Limbs, q: &Limbs) {
        let base = BlsScalar::from(u64::MAX) + BlsScalar::one();
        let one = BlsScalar::one();

        let mut carry: Option<(Witness, BigUint)> = None;

        for (k, c_k) in c.iter().enumerate() {
            let mut terms = Vec::new();
            let mut sum = BigUint::default();

            if let Some(m_k) = m.limbs.get(k) {
                terms.push((one, *m_k));
                sum += scalar_to_biguint(&self[*m_k]);
            }

            for (i, q_i) in q.limbs.iter().enumerate() {
                let r_j = match k.checked_sub(i).and_then(|j| FR_MODULUS.get(j))
                {
                    Some(r_j) => *r_j,
                    None => continue,
                };

                terms.push((BlsScalar::from(r_j), *q_i));
                sum += scalar_to_biguint(&self[*q_i]) * r_j;
            }

            if let Some((w, value)) = &carry {
                terms.push((one, *w));
                sum += value;
            }

            terms.push((-one, *c_k));

            // the top limb closes the chain without a carry
            let next = if k + 1 < c.len() {
                let value: BigUint = sum >> LIMB_BITS;
                let w = self.append_witness(biguint_to_scalar(&value));
                self.component_bits(w, CARRY_BITS);

                terms.push((-base, w));
                Some((w, value))
            } else {
                None
            };

            let zero = BlsScalar::zero();
            let eq = self.component_linear_combination(&terms, zero);
            self.assert_equal_constant(eq, 0);

            carry = next;
        }
    }
}

/// A scalar with its 64 bits limbs
#[derive(Debug)]
struct Limbs {
    value: Witness,
    limbs: Vec<Witness>,
}

/// Little endian 64 bits limbs of `value`, padded to `count`
fn limbs(value: &BigUint, count: usize) -> Vec<BlsScalar> {
    let mut digits = value.to_u64_digits();
    digits.resize(count, 0);

    digits.into_iter().map(BlsScalar::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use dusk_bls12_381::G1Projective;
    use ff::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hash_g1_matches_the_native_hash() {
        let mut rng = StdRng::seed_from_u64(0xdec0);
        let hasher = Hasher::default();

        let points = [
            G1Affine::identity(),
            G1Affine::generator(),
            G1Affine::from(
                G1Projective::generator() * BlsScalar::random(&mut rng),
            ),
        ];

        for point in points {
            let mut composer = Composer::initialized();
            let hash = composer.component_hash_g1(&hasher, &point);

            assert_eq!(composer[hash], hasher.hash_g1(&point));
            assert_eq!(composer.unsatisfied_row(), None);
        }
    }

    #[test]
    fn wrong_quotient_is_rejected() {
        let point = G1Affine::generator();
        let (x, _) = decomposition::coordinates(&point);
        let mut hint = decomposition::decompose(&x);
        hint.quotient += BlsScalar::one();

        let mut composer = Composer::initialized();
        composer.coordinate_with_hint(&x, &hint);

        assert!(composer.unsatisfied_row().is_some());
    }

    #[test]
    fn wrong_remainder_is_rejected() {
        let point = G1Affine::generator();
        let (_, y) = decomposition::coordinates(&point);
        let mut hint = decomposition::decompose(&y);
        hint.remainder -= BlsScalar::one();

        let mut composer = Composer::initialized();
        composer.coordinate_with_hint(&y, &hint);

        assert!(composer.unsatisfied_row().is_some());
    }
}
